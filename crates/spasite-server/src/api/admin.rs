//! Admin dashboard endpoints. Every route here sits behind
//! [`crate::middleware::require_admin`]; unlike the public views these
//! surface store failures as structured errors.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use spasite_core::reviews::{normalize_blocklist_timestamps, normalize_blocklist_words};
use spasite_core::{apply_promotion_edit, PriceEntry, Promotion, ReviewAuditRecord, Service};

use crate::middleware::{AdminIdentity, RequestId};

use super::{map_db_error, map_sync_error, ApiError, ApiResponse, AppState};

// ---------------------------------------------------------------------------
// Sync triggers
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct SyncTriggerResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved: Option<usize>,
}

impl From<spasite_sync::SyncSummary> for SyncTriggerResult {
    fn from(summary: spasite_sync::SyncSummary) -> Self {
        Self {
            success: true,
            message: format!(
                "Synced {} reviews, {} approved for display",
                summary.total, summary.approved
            ),
            total: Some(summary.total),
            approved: Some(summary.approved),
        }
    }
}

impl From<spasite_sync::HoursSyncSummary> for SyncTriggerResult {
    fn from(summary: spasite_sync::HoursSyncSummary) -> Self {
        Self {
            success: true,
            message: format!(
                "Synced business hours ({} special dates)",
                summary.special_days
            ),
            total: None,
            approved: None,
        }
    }
}

pub(super) async fn sync_reviews(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(admin): Extension<AdminIdentity>,
) -> Result<Json<ApiResponse<SyncTriggerResult>>, ApiError> {
    tracing::info!(admin = %admin.0, "manual review sync requested");
    let summary = spasite_sync::perform_review_sync(&state.places, state.store.as_ref())
        .await
        .map_err(|e| map_sync_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(req_id.0, summary.into())))
}

pub(super) async fn sync_hours(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(admin): Extension<AdminIdentity>,
) -> Result<Json<ApiResponse<SyncTriggerResult>>, ApiError> {
    tracing::info!(admin = %admin.0, "manual hours sync requested");
    let summary = spasite_sync::perform_hours_sync(&state.places, state.store.as_ref())
        .await
        .map_err(|e| map_sync_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(req_id.0, summary.into())))
}

// ---------------------------------------------------------------------------
// Review moderation
// ---------------------------------------------------------------------------

pub(super) async fn get_review_audit(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Option<ReviewAuditRecord>>>, ApiError> {
    let audit = spasite_db::load_review_audit(state.store.as_ref())
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(req_id.0, audit)))
}

#[derive(Debug, Serialize)]
pub(super) struct BlocklistsData {
    timestamps: Vec<String>,
    words: Vec<String>,
}

pub(super) async fn get_blocklists(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<BlocklistsData>>, ApiError> {
    let store = state.store.as_ref();
    let timestamps = spasite_db::load_timestamp_blocklist(store)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let words = spasite_db::load_word_blocklist(store)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(
        req_id.0,
        BlocklistsData { timestamps, words },
    )))
}

#[derive(Debug, Deserialize)]
pub(super) struct TimestampBlocklistRequest {
    pub timestamps: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WordBlocklistRequest {
    pub words: Vec<String>,
}

pub(super) async fn put_timestamp_blocklist(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<TimestampBlocklistRequest>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let timestamps = normalize_blocklist_timestamps(body.timestamps);
    spasite_db::save_timestamp_blocklist(state.store.as_ref(), timestamps.clone())
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    tracing::info!(count = timestamps.len(), "timestamp blocklist replaced");
    Ok(Json(ApiResponse::new(req_id.0, timestamps)))
}

pub(super) async fn put_word_blocklist(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<WordBlocklistRequest>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let words = normalize_blocklist_words(body.words);
    spasite_db::save_word_blocklist(state.store.as_ref(), words.clone())
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    tracing::info!(count = words.len(), "word blocklist replaced");
    Ok(Json(ApiResponse::new(req_id.0, words)))
}

// ---------------------------------------------------------------------------
// Catalog edits
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct UpdatePricesRequest {
    pub prices: Vec<PriceEntry>,
}

pub(super) async fn put_service_prices(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(body): Json<UpdatePricesRequest>,
) -> Result<Json<ApiResponse<Service>>, ApiError> {
    spasite_core::catalog::validate_prices(&body.prices).map_err(|e| {
        ApiError::new(req_id.0.clone(), "validation_error", e.to_string())
    })?;

    let store = state.store.as_ref();
    let Some(mut service) = spasite_db::load_service(store, &id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
    else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("service '{id}' not found"),
        ));
    };

    service.prices = body.prices;
    spasite_db::save_service(store, &service)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    tracing::info!(service = %service.id, prices = service.prices.len(), "service prices updated");
    Ok(Json(ApiResponse::new(req_id.0, service)))
}

pub(super) async fn list_promotions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Promotion>>>, ApiError> {
    let promotions = spasite_db::list_promotions(state.store.as_ref())
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(req_id.0, promotions)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PromotionEditResult {
    promotion: Promotion,
    disabled: Vec<String>,
}

/// Saves one promotion. If it is enabled, every other enabled promotion is
/// switched off in the same atomic write.
///
/// Edits are serialized within this process only; two server processes
/// editing at once can still leave more than one promotion enabled.
pub(super) async fn put_promotion(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(mut edited): Json<Promotion>,
) -> Result<Json<ApiResponse<PromotionEditResult>>, ApiError> {
    edited.id = id;
    edited
        .validate()
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let _edit_guard = state.promotion_edits.lock().await;
    let store = state.store.as_ref();
    let existing = spasite_db::list_promotions(store)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let writes = apply_promotion_edit(&existing, edited);
    spasite_db::save_promotions(store, &writes)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let mut writes = writes.into_iter();
    let Some(promotion) = writes.next() else {
        return Err(ApiError::new(
            req_id.0,
            "internal_error",
            "promotion edit produced no writes",
        ));
    };
    let disabled: Vec<String> = writes.map(|p| p.id).collect();
    tracing::info!(promotion = %promotion.id, enabled = promotion.enabled, disabled = disabled.len(), "promotion saved");

    Ok(Json(ApiResponse::new(
        req_id.0,
        PromotionEditResult {
            promotion,
            disabled,
        },
    )))
}

// ---------------------------------------------------------------------------
// Holiday labels
// ---------------------------------------------------------------------------

pub(super) async fn get_holiday_labels(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<BTreeMap<String, String>>>, ApiError> {
    let labels = spasite_db::load_holiday_labels(state.store.as_ref())
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(req_id.0, labels)))
}

pub(super) async fn put_holiday_labels(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<BTreeMap<String, String>>,
) -> Result<Json<ApiResponse<BTreeMap<String, String>>>, ApiError> {
    let mut labels = BTreeMap::new();
    for (date, label) in body {
        let date = date.trim().to_string();
        if NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
            return Err(ApiError::new(
                req_id.0,
                "validation_error",
                format!("holiday label key must be YYYY-MM-DD, got '{date}'"),
            ));
        }
        let label = label.trim().to_string();
        if !label.is_empty() {
            labels.insert(date, label);
        }
    }

    spasite_db::save_holiday_labels(state.store.as_ref(), &labels)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(req_id.0, labels)))
}
