use crate::resolvers::Refresh;
use chrono::Utc;
use cron::Schedule;
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;

/// Runs `task.refresh()` on every upcoming occurrence of the cron
/// schedule. The job never aborts on task failures; resolvers record their
/// own status.
pub fn spawn_job(schedule: Schedule, name: &'static str, task: Arc<dyn Refresh>) -> JoinHandle<()> {
    log::info!("spawn refresh job: {name}");
    tokio::spawn(async move {
        loop {
            let Some(next) = schedule.upcoming(Utc).next() else {
                log::warn!("job {name}: schedule has no upcoming occurrences, stopping");
                return;
            };
            let delay = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
            tokio::time::sleep(delay).await;
            log::debug!("running scheduled job: {name}");
            task.refresh().await;
        }
    })
}
