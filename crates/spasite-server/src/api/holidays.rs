use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use spasite_core::{resolve_holiday_notice, HolidayNotice};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct HolidayQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(super) enum HolidayData {
    Notice(HolidayNotice),
    None {
        #[serde(rename = "hasHoliday")]
        has_holiday: bool,
    },
}

impl HolidayData {
    fn none() -> Self {
        HolidayData::None { has_holiday: false }
    }
}

/// Closure or early-closing notice for today or tomorrow. `?date=` lets the
/// dashboard preview another day.
pub(super) async fn get_holiday_notice(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<HolidayQuery>,
) -> Result<Json<ApiResponse<HolidayData>>, ApiError> {
    let reference = match query.date.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            ApiError::new(
                req_id.0.clone(),
                "validation_error",
                format!("date must be YYYY-MM-DD, got '{raw}'"),
            )
        })?,
        _ => Local::now().date_naive(),
    };

    let hours = match spasite_db::load_business_hours(state.store.as_ref()).await {
        Ok(Some(hours)) => hours,
        Ok(None) => return Ok(Json(ApiResponse::new(req_id.0, HolidayData::none()))),
        Err(e) => {
            tracing::error!(error = %e, "failed to load business hours");
            return Ok(Json(ApiResponse::new(req_id.0, HolidayData::none())));
        }
    };
    let labels = spasite_db::load_holiday_labels(state.store.as_ref())
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load holiday labels");
            Default::default()
        });

    let data = resolve_holiday_notice(&hours, &labels, reference)
        .map_or_else(HolidayData::none, HolidayData::Notice);
    Ok(Json(ApiResponse::new(req_id.0, data)))
}
