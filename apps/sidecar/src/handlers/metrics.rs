// [apps/sidecar/src/handlers/metrics.rs]
//! `GET /metrics` — Prometheus text exposition of the process-local counters.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::state::AppState;

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.counters().render_prometheus(),
    )
        .into_response()
}
