// [apps/sidecar/src/services/stats_worker.rs]
//! Periodic counter flush to the remote oracle, `§4.8`.

use std::time::Duration;

use tokio::time::interval;
use tracing::{error, info, instrument};

use crate::state::AppState;

const STATS_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Spawns the stats-flush daemon on the current runtime; returns its join handle.
pub fn spawn_stats_worker(state: AppState) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(STATS_INTERVAL);
        loop {
            ticker.tick().await;
            run_once(&state).await;
        }
    })
}

#[instrument(skip(state))]
async fn run_once(state: &AppState) {
    let snapshot = state.counters().drain(state.node_id());
    if let Err(e) = state.oracle().stats(&snapshot).await {
        error!(error = %e, "oracle /stats unreachable, restoring drained counters");
        state.counters().restore(&snapshot);
        return;
    }
    info!(scanned = snapshot.scanned_count, "stats flushed to oracle");
}
