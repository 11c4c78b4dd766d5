// [apps/sidecar/src/lib.rs]
/*!
 * =================================================================
 * APARATO: RAIZ DE LA LIBRERIA DEL SIDECAR
 * CLASIFICACION: CRATE ROOT (ESTRATO L3)
 * RESPONSABILIDAD: ARBOL DE MODULOS DEL SIDECAR DE CLASIFICACION
 * =================================================================
 */

/// Carga de configuracion reloadable via SIGHUP.
pub mod config;
/// Contadores de proceso para el worker de estadisticas.
pub mod counters;
/// Adaptadores de entrada HTTP: analyze, report, whitelist, metrics, status.
pub mod handlers;
/// Raiz de composicion: bootstrap, daemons de fondo e ignicion HTTP.
pub mod kernel;
/// Topologia de rutas del servidor Axum.
pub mod routes;
/// Estado compartido entre handlers y workers.
pub mod state;
/// Daemons periodicos de sincronizacion y estadisticas.
pub mod services;

/// Re-exportacion minima para la ignicion desde `main.rs`.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::kernel::SidecarKernel;
    pub use crate::state::AppState;
}
