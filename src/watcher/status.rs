use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::engine::TickReport;

/// What the liveness endpoint reports about the loop.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusSnapshot {
    pub ticks: u64,
    pub last_tick_at: Option<DateTime<Utc>>,
    pub last_report: TickReport,
}

#[derive(Clone, Default)]
pub struct WatchStatus {
    inner: Arc<RwLock<StatusSnapshot>>,
}

impl WatchStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, report: TickReport) {
        let mut status = self.inner.write().await;
        status.ticks += 1;
        status.last_tick_at = Some(Utc::now());
        status.last_report = report;
    }

    pub async fn snapshot(&self) -> StatusSnapshot {
        self.inner.read().await.clone()
    }
}
