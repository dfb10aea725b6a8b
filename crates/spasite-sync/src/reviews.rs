//! Review sync: fetch, classify, and replace both persisted review records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use spasite_core::reviews::public_subset;
use spasite_core::{classify_all, Blocklists, PublicReviewsRecord, ReviewAuditRecord};
use spasite_db::{
    load_timestamp_blocklist, load_word_blocklist, save_public_reviews, save_review_audit,
    DocumentStore,
};
use spasite_places::PlacesClient;

use crate::error::SyncError;

/// Counts reported back to whichever trigger ran the sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub total: usize,
    pub approved: usize,
}

/// Runs a review sync stamped with the current time.
///
/// # Errors
///
/// See [`perform_review_sync_at`].
pub async fn perform_review_sync(
    client: &PlacesClient,
    store: &dyn DocumentStore,
) -> Result<SyncSummary, SyncError> {
    perform_review_sync_at(client, store, Utc::now()).await
}

/// Fetches every review, classifies it against the current blocklists and
/// replaces the audit and public records.
///
/// Each record is written as one whole document, audit first. Running the
/// sync again with unchanged upstream data rewrites identical records apart
/// from `lastSyncedAt`.
///
/// # Errors
///
/// - [`SyncError::UpstreamFetch`] / [`SyncError::UpstreamParse`] if the
///   source cannot be read; nothing is written in that case.
/// - [`SyncError::Store`] if either record cannot be written.
pub async fn perform_review_sync_at(
    client: &PlacesClient,
    store: &dyn DocumentStore,
    synced_at: DateTime<Utc>,
) -> Result<SyncSummary, SyncError> {
    let payload = client.fetch_reviews().await?;
    let blocklists = load_blocklists(store).await;

    let classified = classify_all(&payload.reviews, &blocklists);
    let approved = public_subset(&classified);
    let summary = SyncSummary {
        total: classified.len(),
        approved: approved.len(),
    };

    let audit = ReviewAuditRecord {
        reviews: classified,
        total_review_count: payload.total_review_count,
        average_rating: payload.average_rating.clone(),
        last_synced_at: synced_at,
    };
    save_review_audit(store, &audit).await?;

    let public = PublicReviewsRecord {
        reviews: approved,
        total_review_count: payload.total_review_count,
        average_rating: payload.average_rating,
        last_synced_at: Some(synced_at),
    };
    save_public_reviews(store, &public).await?;

    tracing::info!(
        total = summary.total,
        approved = summary.approved,
        "review sync complete"
    );
    Ok(summary)
}

/// Reads both blocklists; a list that cannot be read is treated as empty.
async fn load_blocklists(store: &dyn DocumentStore) -> Blocklists {
    let timestamps = load_timestamp_blocklist(store).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "timestamp blocklist unavailable, continuing without it");
        Vec::new()
    });
    let words = load_word_blocklist(store).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "word blocklist unavailable, continuing without it");
        Vec::new()
    });
    Blocklists::new(timestamps, words)
}
