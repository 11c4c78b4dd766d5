// [apps/sidecar/src/handlers/analyze.rs]
//! `POST /analyze` — MIME ingestion, signature extraction, four-layer match.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use guardian_domain_signatures::extractor::extract_signatures;
use guardian_domain_signatures::ExtractionOutcome;
use guardian_infra_store::{hash_message_id, ScanRecord};
use serde_json::json;
use tracing::{instrument, warn};

use crate::state::AppState;

/// `§6`: bodies larger than this are truncated, not rejected.
const MAX_ANALYZE_BODY_BYTES: usize = 15 * 1024 * 1024;

#[instrument(skip(state, body), fields(body_len = body.len()))]
pub async fn analyze(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let raw = if body.len() > MAX_ANALYZE_BODY_BYTES {
        &body[..MAX_ANALYZE_BODY_BYTES]
    } else {
        &body[..]
    };

    let whitelist = match state.whitelist_snapshot().await {
        Ok(w) => w,
        Err(e) => {
            warn!(error = %e, "store unavailable while loading whitelist");
            return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": "store unavailable"}))).into_response();
        }
    };

    let outcome = match extract_signatures(raw, &whitelist, &state.signature_config()) {
        Ok(o) => o,
        Err(_) => return (StatusCode::BAD_REQUEST, Json(json!({"error": "Invalid MIME"}))).into_response(),
    };

    let (message_id, signatures) = match outcome {
        ExtractionOutcome::Whitelisted(verdict) => return Json(verdict).into_response(),
        ExtractionOutcome::Signatures { message_id, signatures } => (message_id, signatures),
    };

    let matcher = state.matcher();
    let analysis = matcher.analyze(&signatures).await;
    state.counters().record(&analysis.telemetry);

    if let Some(message_id) = message_id {
        let store = state.store().clone();
        let hashes = analysis.verdict.hashes.clone();
        tokio::spawn(async move {
            let record = ScanRecord {
                hashes,
                timestamp: Utc::now().timestamp(),
            };
            let mid_hash = hash_message_id(&message_id);
            if let Err(e) = store.set_scan_record(&mid_hash, &record).await {
                warn!(error = %e, "failed to persist scan record");
            }
        });
    }

    Json(analysis.verdict).into_response()
}
