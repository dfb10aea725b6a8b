//! Callable-function transport for the sync triggers.
//!
//! Requests are `POST` with a `{"data": ...}` body and the caller's bearer
//! token. The sync functions take no arguments, so `data` is not read.
//! Answers are `{"result": ...}` on success or
//! `{"error": {"status", "message"}}` with the matching HTTP status.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use spasite_sync::SyncError;

use crate::api::{AppState, SyncTriggerResult};
use crate::middleware::{AdminIdentity, AuthFailure};

#[derive(Debug, Serialize)]
struct CallableResult<T: Serialize> {
    result: T,
}

#[derive(Debug, Serialize)]
struct CallableErrorBody {
    error: CallableError,
}

#[derive(Debug, Serialize)]
struct CallableError {
    status: &'static str,
    message: String,
}

fn callable_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(CallableErrorBody {
            error: CallableError {
                status: code,
                message: message.into(),
            },
        }),
    )
        .into_response()
}

fn auth_error(failure: AuthFailure) -> Response {
    match failure {
        AuthFailure::Unauthenticated => callable_error(
            StatusCode::UNAUTHORIZED,
            "UNAUTHENTICATED",
            "the function must be called while authenticated",
        ),
        AuthFailure::Forbidden => callable_error(
            StatusCode::FORBIDDEN,
            "PERMISSION_DENIED",
            "only administrators may call this function",
        ),
    }
}

fn sync_error(error: &SyncError) -> Response {
    tracing::error!(error = %error, "callable sync failed");
    callable_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL",
        error.to_string(),
    )
}

async fn authorize(state: &AppState, headers: &HeaderMap) -> Result<AdminIdentity, Response> {
    state.auth.authorize(headers).await.map_err(auth_error)
}

pub(crate) async fn sync_reviews(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let admin = match authorize(&state, &headers).await {
        Ok(admin) => admin,
        Err(response) => return response,
    };
    tracing::info!(admin = %admin.0, "callable review sync requested");

    match spasite_sync::perform_review_sync(&state.places, state.store.as_ref()).await {
        Ok(summary) => Json(CallableResult {
            result: SyncTriggerResult::from(summary),
        })
        .into_response(),
        Err(e) => sync_error(&e),
    }
}

pub(crate) async fn sync_hours(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let admin = match authorize(&state, &headers).await {
        Ok(admin) => admin,
        Err(response) => return response,
    };
    tracing::info!(admin = %admin.0, "callable hours sync requested");

    match spasite_sync::perform_hours_sync(&state.places, state.store.as_ref()).await {
        Ok(summary) => Json(CallableResult {
            result: SyncTriggerResult::from(summary),
        })
        .into_response(),
        Err(e) => sync_error(&e),
    }
}
