use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::engine::Watcher;
use super::status::WatchStatus;

/// Drive `watcher` on a fixed period until `shutdown` fires.
///
/// Ticks never overlap: a tick that overruns the period delays the next one.
/// Shutdown is only observed between ticks.
pub async fn run_watcher(
    mut watcher: Watcher,
    period: Duration,
    status: WatchStatus,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(period_secs = period.as_secs(), "Balance watcher started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.cancelled() => {
                tracing::info!("Shutdown received, stopping balance watcher");
                break;
            }
        }

        let report = watcher.tick().await;
        tracing::debug!(
            checked = report.checked,
            failed = report.failed,
            changes = report.changes,
            sweeps = report.sweeps_attempted,
            cached = watcher.cache().len(),
            "Tick complete"
        );
        if report.checked > 0 && report.failed == report.checked {
            tracing::warn!("Every balance query failed this tick");
        }

        status.record(report).await;
    }
}

/// Wait for a spawned watcher task, logging a panic or cancellation.
/// Returns `true` when the task ended normally.
pub async fn join_watcher(handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "Balance watcher task failed");
            false
        }
    }
}
