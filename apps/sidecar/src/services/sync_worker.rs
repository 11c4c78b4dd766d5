// [apps/sidecar/src/services/sync_worker.rs]
//! Periodic band sync against the remote oracle, `§4.7`.

use std::time::Duration;

use guardian_domain_models::{OracleSyncRequest, SyncAction};
use tokio::time::interval;
use tracing::{error, info, instrument};

use crate::state::AppState;

const SYNC_INTERVAL: Duration = Duration::from_secs(60);

/// Spawns the sync daemon on the current runtime; returns its join handle.
pub fn spawn_sync_worker(state: AppState) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(SYNC_INTERVAL);
        loop {
            ticker.tick().await;
            run_once(&state).await;
        }
    })
}

#[instrument(skip(state))]
async fn run_once(state: &AppState) {
    let current_seq = match state.store().current_seq().await {
        Ok(seq) => seq,
        Err(e) => {
            error!(error = %e, "cannot read current_seq, skipping sync cycle");
            return;
        }
    };

    let request = OracleSyncRequest {
        node_id: state.node_id(),
        current_seq,
        version: crate::state::VERSION.to_string(),
    };

    let response = match state.oracle().sync(&request).await {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "oracle /sync unreachable, state unchanged");
            return;
        }
    };

    match response.action {
        SyncAction::ResetDb => {
            if let Err(e) = state.store().reset_global_bands().await {
                error!(error = %e, "failed to reset global band index");
                return;
            }
        }
        SyncAction::UpdateDelta => {
            for op in &response.ops {
                let outcome = match op.action.as_str() {
                    "add" => state.store().set_global_bands(&op.bands).await,
                    "del" => state.store().del_global_bands(&op.bands).await,
                    other => {
                        error!(op = other, "unrecognized sync op action, skipping");
                        continue;
                    }
                };
                if let Err(e) = outcome {
                    error!(error = %e, "failed to apply sync op, aborting cycle before seq persist");
                    return;
                }
            }
        }
    }

    if let Err(e) = state.store().set_seq(response.new_seq).await {
        error!(error = %e, "failed to persist new sync sequence");
        return;
    }
    info!(new_seq = response.new_seq, "sync cycle applied");
}
