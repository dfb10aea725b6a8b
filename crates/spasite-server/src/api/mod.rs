mod admin;
mod catalog;
mod giftcards;
mod holidays;
mod reviews;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use spasite_db::DocumentStore;
use spasite_places::PlacesClient;
use spasite_sync::SyncError;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{
    enforce_rate_limit, request_id, require_admin, AdminAuth, RateLimitState, RequestId,
};
use crate::rpc;

pub(crate) use admin::SyncTriggerResult;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub places: Arc<PlacesClient>,
    pub auth: AdminAuth,
    /// Held across the read and write of a promotion edit.
    pub promotion_edits: Arc<Mutex<()>>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    store: &'static str,
}

impl ResponseMeta {
    pub(crate) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(crate) fn new(request_id: String, data: T) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "forbidden" => StatusCode::FORBIDDEN,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "sync_failed" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: String, error: &spasite_db::DbError) -> ApiError {
    tracing::error!(error = %error, "store operation failed");
    ApiError::new(request_id, "internal_error", "store operation failed")
}

pub(crate) fn map_sync_error(request_id: String, error: &SyncError) -> ApiError {
    tracing::error!(error = %error, "sync failed");
    match error {
        SyncError::UpstreamFetch(_) | SyncError::UpstreamParse(_) => {
            ApiError::new(request_id, "sync_failed", error.to_string())
        }
        SyncError::Store(_) => ApiError::new(request_id, "internal_error", "store operation failed"),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn public_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/reviews", get(reviews::list_reviews))
        .route("/api/v1/services", get(catalog::list_services))
        .route("/api/v1/promotions", get(catalog::list_active_promotions))
        .route(
            "/api/v1/promotion-summary",
            get(catalog::get_promotion_summary),
        )
        .route("/api/v1/giftcards", get(giftcards::list_active_gift_cards))
        .route("/api/v1/holidays", get(holidays::get_holiday_notice))
}

fn admin_router(auth: AdminAuth, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/admin/sync-reviews", post(admin::sync_reviews))
        .route("/api/v1/admin/sync-hours", post(admin::sync_hours))
        .route("/api/v1/admin/reviews", get(admin::get_review_audit))
        .route("/api/v1/admin/blocklists", get(admin::get_blocklists))
        .route(
            "/api/v1/admin/blocklists/timestamps",
            put(admin::put_timestamp_blocklist),
        )
        .route(
            "/api/v1/admin/blocklists/words",
            put(admin::put_word_blocklist),
        )
        .route(
            "/api/v1/admin/services/{id}/prices",
            put(admin::put_service_prices),
        )
        .route("/api/v1/admin/promotions", get(admin::list_promotions))
        .route("/api/v1/admin/promotions/{id}", put(admin::put_promotion))
        .route(
            "/api/v1/admin/holidays/labels",
            get(admin::get_holiday_labels).put(admin::put_holiday_labels),
        )
        .route_layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(auth, require_admin)),
        )
}

fn rpc_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/rpc/syncReviews", post(rpc::sync_reviews))
        .route("/rpc/syncHours", post(rpc::sync_hours))
        .route_layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    Router::new()
        .merge(public_router())
        .merge(admin_router(state.auth.clone(), rate_limit.clone()))
        .merge(rpc_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::new(
                req_id.0,
                HealthData {
                    status: "ok",
                    store: "ok",
                },
            )),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::new(
                    req_id.0,
                    HealthData {
                        status: "degraded",
                        store: "unavailable",
                    },
                )),
            )
        }
    }
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

#[cfg(test)]
pub(crate) mod test_support;
