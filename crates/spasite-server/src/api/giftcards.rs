use axum::{extract::State, Extension, Json};
use chrono::Local;
use serde::Serialize;
use spasite_core::active_gift_card_ids;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GiftCardsData {
    active_ids: Vec<String>,
}

pub(super) async fn list_active_gift_cards(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<GiftCardsData>> {
    let cards = spasite_db::list_gift_cards(state.store.as_ref())
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to load gift cards");
            Vec::new()
        });

    let active_ids = active_gift_card_ids(&cards, Local::now().date_naive());
    Json(ApiResponse::new(req_id.0, GiftCardsData { active_ids }))
}
