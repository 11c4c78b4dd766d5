// [apps/sidecar/src/kernel.rs]
/*!
 * =================================================================
 * APARATO: KERNEL SOBERANO DEL SIDECAR
 * CLASIFICACION: COMPOSITION ROOT (ESTRATO L1-APP)
 * RESPONSABILIDAD: BOOTSTRAP DE INFRAESTRUCTURA, DAEMONS DE FONDO E
 * IGNICION DEL SERVIDOR HTTP
 * =================================================================
 */

use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::net::TcpListener;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, instrument};

use crate::config::Config;
use crate::routes::build_router;
use crate::services::{spawn_stats_worker, spawn_sync_worker};
use crate::state::AppState;

pub struct SidecarKernel {
    pub bind_addr: String,
    pub port: u16,
    pub application_state: AppState,
}

impl SidecarKernel {
    /// Connects to the index store and mints this node's identity.
    #[instrument(skip(config))]
    pub async fn ignite(config: Config, config_path: PathBuf) -> Self {
        let bind_addr = config.bind_addr.clone();
        let port = config.port;
        let application_state = AppState::bootstrap(config, config_path)
            .await
            .expect("FATAL: index store unreachable at startup. Ignition aborted.");

        Self {
            bind_addr,
            port,
            application_state,
        }
    }

    /// Spawns the background workers and the SIGHUP reload listener, then
    /// serves HTTP until the process is terminated.
    pub async fn launch(self) {
        let state = self.application_state;

        spawn_sync_worker(state.clone());
        spawn_stats_worker(state.clone());
        spawn_sighup_listener(state.clone());

        let router = build_router(state);

        let bind_address: SocketAddr = format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .expect("invalid bind address");

        info!(%bind_address, "sidecar listening");

        let listener = TcpListener::bind(bind_address)
            .await
            .expect("failed to bind HTTP port");

        if let Err(e) = axum::serve(listener, router).await {
            error!(error = %e, "HTTP server terminated unexpectedly");
            std::process::exit(1);
        }
    }
}

/// Swaps in a freshly re-read configuration every time the process
/// receives `SIGHUP`.
fn spawn_sighup_listener(state: AppState) {
    tokio::spawn(async move {
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "cannot install SIGHUP handler");
                return;
            }
        };
        loop {
            hangup.recv().await;
            state.reload_config();
        }
    });
}
