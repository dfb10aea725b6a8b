//! Background job scheduler.
//!
//! Registers the daily sync job: reviews first, then business hours. Job
//! failures are logged; there is no caller to report them to.

use std::sync::Arc;

use spasite_db::DocumentStore;
use spasite_places::PlacesClient;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive for
/// the lifetime of the process. Dropping it shuts down all scheduled jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the cron expression is rejected, or the scheduler fails to start.
pub async fn build_scheduler(
    store: Arc<dyn DocumentStore>,
    places: Arc<PlacesClient>,
    cron: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_daily_sync_job(&scheduler, store, places, cron).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the daily sync job on `cron` (6-field, UTC).
async fn register_daily_sync_job(
    scheduler: &JobScheduler,
    store: Arc<dyn DocumentStore>,
    places: Arc<PlacesClient>,
    cron: &str,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let store = Arc::clone(&store);
        let places = Arc::clone(&places);

        Box::pin(async move {
            tracing::info!("scheduler: starting daily sync");
            run_daily_sync(store.as_ref(), &places).await;
            tracing::info!("scheduler: daily sync complete");
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron, "scheduler: daily sync registered");
    Ok(())
}

/// Review sync then hours sync. A failed review sync does not skip the
/// hours sync.
pub(crate) async fn run_daily_sync(store: &dyn DocumentStore, places: &PlacesClient) {
    match spasite_sync::perform_review_sync(places, store).await {
        Ok(summary) => tracing::info!(
            total = summary.total,
            approved = summary.approved,
            "scheduler: review sync succeeded"
        ),
        Err(e) => tracing::error!(error = %e, "scheduler: review sync failed"),
    }

    match spasite_sync::perform_hours_sync(places, store).await {
        Ok(summary) => tracing::info!(
            special_days = summary.special_days,
            "scheduler: hours sync succeeded"
        ),
        Err(e) => tracing::error!(error = %e, "scheduler: hours sync failed"),
    }
}
