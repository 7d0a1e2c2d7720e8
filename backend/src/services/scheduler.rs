use crate::services::automation_engine::AutomationService;
use chrono::Utc;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Every five seconds (the cron format includes a seconds field)
pub const DEFAULT_SWEEP_CRON: &str = "*/5 * * * * *";

/// Builds the job that turns the main light off once the room has been idle
/// long enough, even when no reports arrive.
pub fn idle_sweep_job(
    service: Arc<AutomationService>,
    cron: &str,
) -> Result<Job, JobSchedulerError> {
    Job::new_async(cron, move |_uuid, _l| {
        let service = service.clone();
        Box::pin(async move {
            match service.sweep_idle(Utc::now().naive_utc()).await {
                Ok(outcome) if outcome.triggered => {
                    log::info!("Idle sweep turned the main light off");
                }
                Ok(_) => {}
                Err(e) => log::error!("Idle sweep failed: {}", e),
            }
        })
    })
}

/// Starts the scheduler with the idle sweep job. The returned handle must be
/// kept alive for as long as the sweep should run.
pub async fn start_idle_sweeper(
    service: Arc<AutomationService>,
    cron: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let job = idle_sweep_job(service, cron)?;

    let sched = JobScheduler::new().await?;
    sched.add(job).await?;
    sched.start().await?;

    log::info!("Idle sweeper scheduled: {}", cron);
    Ok(sched)
}
