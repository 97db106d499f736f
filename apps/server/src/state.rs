//! Shared application state.

use std::sync::Arc;

use tokio::sync::RwLock;

use socsync_core::SyncStats;
use socsync_engine::{RunResult, SocApiClient, SyncEngine};

/// State shared across request handlers.
///
/// Keeps the statistics snapshot of the most recent run, completed or
/// aborted, so `GET /sync/statistics` can serve it without re-running.
pub struct AppState {
    pub engine: SyncEngine<SocApiClient>,
    last_stats: RwLock<Option<SyncStats>>,
}

impl AppState {
    pub fn new(engine: SyncEngine<SocApiClient>) -> Arc<Self> {
        Arc::new(AppState {
            engine,
            last_stats: RwLock::new(None),
        })
    }

    /// Stores the run's statistics and hands the result back.
    pub async fn record_run(&self, result: RunResult) -> RunResult {
        let stats = match &result {
            Ok(stats) => stats.clone(),
            Err(aborted) => aborted.stats.clone(),
        };
        *self.last_stats.write().await = Some(stats);
        result
    }

    /// Returns the statistics of the most recent run, if any.
    pub async fn last_stats(&self) -> Option<SyncStats> {
        self.last_stats.read().await.clone()
    }
}
