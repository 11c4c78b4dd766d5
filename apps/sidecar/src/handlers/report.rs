// [apps/sidecar/src/handlers/report.rs]
//! `POST /report` — spam/ham corrections against a previously analyzed message.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use guardian_domain_learner::ReportOutcome;
use guardian_domain_models::{DuplicateReportResponse, ReportRequest};
use serde_json::json;
use tracing::{instrument, warn};

use crate::state::AppState;

#[instrument(skip(state), fields(report_type = ?request.report_type))]
pub async fn report(State(state): State<AppState>, Json(request): Json<ReportRequest>) -> impl IntoResponse {
    let learner = state.learner();
    match learner.report(state.node_id(), &request.message_id, request.report_type).await {
        Ok(ReportOutcome::Duplicate) => {
            (StatusCode::CONFLICT, Json(DuplicateReportResponse::default())).into_response()
        }
        Ok(ReportOutcome::NoScanData) => {
            (StatusCode::NOT_FOUND, Json(json!({"error": "no scan data for message-id"}))).into_response()
        }
        Ok(ReportOutcome::EmptyHashes) => {
            (StatusCode::BAD_REQUEST, Json(json!({"error": "scan record carries no signatures"}))).into_response()
        }
        Ok(ReportOutcome::SkippedKnownLocally) => {
            (StatusCode::OK, Json(json!({"status": "skipped_oracle", "reason": "known_locally"}))).into_response()
        }
        Ok(ReportOutcome::Proxied(proxied)) => {
            let status = StatusCode::from_u16(proxied.status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, proxied.body).into_response()
        }
        Ok(ReportOutcome::OracleUnavailable) => {
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": "oracle unavailable"}))).into_response()
        }
        Err(e) => {
            warn!(error = %e, "store failure while processing report");
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": "store unavailable"}))).into_response()
        }
    }
}
