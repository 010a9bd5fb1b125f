//! Background job scheduler.
//!
//! Registers the optional catalog refresh job when a cron expression is
//! configured.

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::state::AppState;

/// Builds and starts the background job scheduler.
///
/// The returned handle must be kept alive for the lifetime of the process;
/// dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(
    state: AppState,
    refresh_cron: Option<&str>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    match refresh_cron {
        Some(cron) => register_refresh_job(&scheduler, state, cron).await?,
        None => tracing::info!("scheduler: POPMAP_REFRESH_CRON not set; catalog refresh disabled"),
    }

    scheduler.start().await?;
    Ok(scheduler)
}

/// Reloads the store snapshot on `cron` and swaps the served catalog.
async fn register_refresh_job(
    scheduler: &JobScheduler,
    state: AppState,
    cron: &str,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let state = state.clone();

        Box::pin(async move {
            tracing::info!("scheduler: starting catalog refresh");
            match state.refresh().await {
                Some(origin) => tracing::info!(%origin, "scheduler: catalog refresh complete"),
                None => tracing::info!("scheduler: catalog refresh superseded; result discarded"),
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron, "scheduler: catalog refresh registered");
    Ok(())
}
