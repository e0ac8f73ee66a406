//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring check cycle.

use std::sync::Arc;

use hourwatch_pipeline::LiveMonitor;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the schedule is not a valid cron expression, or the scheduler fails to start.
pub async fn build_scheduler(
    monitor: Arc<LiveMonitor>,
    schedule: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_check_job(&scheduler, monitor, schedule).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the check cycle on `schedule` (seconds-first cron).
///
/// A tick that fires while the previous cycle is still running is skipped.
async fn register_check_job(
    scheduler: &JobScheduler,
    monitor: Arc<LiveMonitor>,
    schedule: &str,
) -> Result<(), JobSchedulerError> {
    let running = Arc::new(Mutex::new(()));

    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let monitor = Arc::clone(&monitor);
        let running = Arc::clone(&running);

        Box::pin(async move {
            let Ok(_guard) = running.try_lock() else {
                tracing::warn!("scheduler: previous check cycle still running; skipping tick");
                return;
            };

            tracing::info!("scheduler: starting check cycle");
            let report = monitor.run_cycle(chrono::Utc::now()).await;
            tracing::info!(
                records = report.records.len(),
                mismatches = report.mismatches(),
                failures = report.failures.len(),
                "scheduler: check cycle complete"
            );
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(schedule, "scheduler: check job registered");
    Ok(())
}
