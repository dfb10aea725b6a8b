use serde::Serialize;

use spasite_db::{save_business_hours, DocumentStore};
use spasite_places::PlacesClient;

use crate::error::SyncError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HoursSyncSummary {
    pub regular_days: usize,
    pub special_days: usize,
}

/// Replaces the stored business-hours record with the source's current one.
///
/// # Errors
///
/// Returns [`SyncError`] if the source cannot be read or the record cannot
/// be written.
pub async fn perform_hours_sync(
    client: &PlacesClient,
    store: &dyn DocumentStore,
) -> Result<HoursSyncSummary, SyncError> {
    let record = client.fetch_hours().await?;
    save_business_hours(store, &record).await?;

    let summary = HoursSyncSummary {
        regular_days: record.regular_hours.len(),
        special_days: record.special_hours.len(),
    };
    tracing::info!(
        regular_days = summary.regular_days,
        special_days = summary.special_days,
        "hours sync complete"
    );
    Ok(summary)
}
