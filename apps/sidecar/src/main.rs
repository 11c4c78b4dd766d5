// [apps/sidecar/src/main.rs]
/*!
 * =================================================================
 * APARATO: PUNTO DE ENTRADA DEL SIDECAR
 * CLASIFICACION: APPLICATION SHELL (ESTRATO L3)
 * RESPONSABILIDAD: CARGA DE CONFIGURACION E IGNICION DEL KERNEL
 * =================================================================
 */

use guardian_sidecar::prelude::*;
use guardian_shared_telemetry::init_tracing;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("mi_guardian");

    let config_path = std::env::args()
        .skip_while(|arg| arg != "--config")
        .nth(1)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(guardian_sidecar::config::default_config_path);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let config = Config::load(&config_path);
        info!(path = %config_path.display(), port = config.port, "starting mi-guardian");

        let kernel = SidecarKernel::ignite(config, config_path.clone()).await;
        kernel.launch().await;
    });

    Ok(())
}
