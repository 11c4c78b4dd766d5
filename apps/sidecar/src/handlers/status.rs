// [apps/sidecar/src/handlers/status.rs]
//! `GET /status` — node identity and sync liveness.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use guardian_domain_models::StatusResponse;
use serde_json::json;
use tracing::{instrument, warn};

use crate::state::{AppState, VERSION};

#[instrument(skip(state))]
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    match state.store().current_seq().await {
        Ok(current_seq) => Json(StatusResponse {
            node_id: state.node_id(),
            current_seq,
            version: VERSION.to_string(),
        })
        .into_response(),
        Err(e) => {
            warn!(error = %e, "store unavailable for /status");
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": "store unavailable"}))).into_response()
        }
    }
}
