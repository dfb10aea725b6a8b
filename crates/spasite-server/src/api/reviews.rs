use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use spasite_core::reviews::default_public_reviews;
use spasite_core::{select_display_subset, PublicReview, PublicReviewsRecord, SamplePolicy};

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ReviewsData {
    reviews: Vec<PublicReview>,
    total_review_count: Option<u64>,
    average_rating: Option<String>,
    last_synced_at: Option<DateTime<Utc>>,
}

/// Sampled public reviews. Never fails: a missing or unreadable public
/// record is replaced by the built-in default set.
pub(super) async fn list_reviews(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<ReviewsData>> {
    let record = match spasite_db::load_public_reviews(state.store.as_ref()).await {
        Ok(Some(record)) if !record.reviews.is_empty() => record,
        Ok(_) => {
            tracing::info!("no public reviews stored yet, serving defaults");
            default_public_reviews()
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to load public reviews, serving defaults");
            default_public_reviews()
        }
    };

    Json(ApiResponse::new(req_id.0, sample(record, Utc::now())))
}

fn sample(record: PublicReviewsRecord, now: DateTime<Utc>) -> ReviewsData {
    ReviewsData {
        reviews: select_display_subset(&record.reviews, &SamplePolicy::default(), now),
        total_review_count: record.total_review_count,
        average_rating: record.average_rating,
        last_synced_at: record.last_synced_at,
    }
}
