//! Public price list and promotion views. Each handler degrades to an
//! empty answer when the store cannot be read.

use std::collections::BTreeMap;

use axum::{extract::State, Extension, Json};
use chrono::Utc;
use spasite_core::{
    resolve_active_promotions, resolve_service_pricing, resolve_single_promotion_details,
    EnrichedService, Promotion, PromotionSummary,
};

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

async fn load_promotions(state: &AppState) -> Vec<Promotion> {
    spasite_db::list_promotions(state.store.as_ref())
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to load promotions");
            Vec::new()
        })
}

pub(super) async fn list_services(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<EnrichedService>>> {
    let services = match spasite_db::list_services(state.store.as_ref()).await {
        Ok(services) => services,
        Err(e) => {
            tracing::error!(error = %e, "failed to load services");
            return Json(ApiResponse::new(req_id.0, Vec::new()));
        }
    };
    let promotions = load_promotions(&state).await;

    let data = resolve_service_pricing(&services, &promotions, Utc::now());
    Json(ApiResponse::new(req_id.0, data))
}

pub(super) async fn list_active_promotions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<BTreeMap<String, PromotionSummary>>> {
    let promotions = load_promotions(&state).await;
    Json(ApiResponse::new(
        req_id.0,
        resolve_active_promotions(&promotions, Utc::now()),
    ))
}

pub(super) async fn get_promotion_summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Option<Promotion>>> {
    let promotions = load_promotions(&state).await;
    Json(ApiResponse::new(
        req_id.0,
        resolve_single_promotion_details(&promotions, Utc::now()),
    ))
}
