use crate::artifacts::ArtifactStore;
use anyhow::Result;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

/// What one cleanup cycle did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub deleted: usize,
    pub failed: usize,
}

/// Initialize and start the artifact cleanup job.
///
/// The returned scheduler must be kept alive for the job to keep running.
pub async fn start_janitor(store: ArtifactStore, interval: Duration) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    info!(
        "Scheduling artifact cleanup every {:?} in {}",
        interval,
        store.dir().display()
    );

    let job = Job::new_repeated_async(interval, move |_uuid, _l| {
        let store = store.clone();

        Box::pin(async move {
            info!("⏰ Artifact cleanup triggered");
            let report = sweep(&store).await;
            info!(
                deleted = report.deleted,
                failed = report.failed,
                "Artifact cleanup finished"
            );
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    info!("✓ Janitor started");

    Ok(scheduler)
}

/// Delete every artifact in the store.
///
/// Never fails: a listing error ends the cycle early, and an individual
/// deletion error is logged and skipped. The next cycle starts fresh.
pub async fn sweep(store: &ArtifactStore) -> SweepReport {
    let artifacts = match store.list_all().await {
        Ok(artifacts) => artifacts,
        Err(e) => {
            error!("Artifact cleanup could not list {}: {}", store.dir().display(), e);
            return SweepReport::default();
        }
    };

    let mut report = SweepReport::default();
    for artifact in &artifacts {
        match store.delete(artifact).await {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                warn!(artifact = %artifact, "Failed to delete artifact: {}", e);
                report.failed += 1;
            }
        }
    }

    report
}
