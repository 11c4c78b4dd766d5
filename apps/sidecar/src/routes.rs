// [apps/sidecar/src/routes.rs]
/*!
 * =================================================================
 * APARATO: MATRIZ DE ENRUTAMIENTO HTTP
 * CLASIFICACION: API ADAPTER LAYER (ESTRATO L3)
 * RESPONSABILIDAD: TOPOLOGIA DE ENDPOINTS DEL SIDECAR
 *
 * Sin middleware de autenticacion: el sidecar solo escucha en loopback
 * y el caller local es de confianza.
 * =================================================================
 */

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{analyze, metrics, report, status, whitelist};
use crate::state::AppState;

/// Bodies above this are accepted by the transport layer and truncated by
/// the `/analyze` handler itself, per the 15 MiB soft cap.
const BODY_LIMIT_BYTES: usize = 64 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(status::status))
        .route("/analyze", post(analyze::analyze))
        .route("/report", post(report::report))
        .route(
            "/whitelist",
            get(whitelist::list_whitelist)
                .post(whitelist::add_whitelist)
                .delete(whitelist::remove_whitelist),
        )
        .route("/metrics", get(metrics::metrics))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
