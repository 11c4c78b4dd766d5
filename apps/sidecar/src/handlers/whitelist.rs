// [apps/sidecar/src/handlers/whitelist.rs]
//! `GET`/`POST`/`DELETE /whitelist` — sender exemptions.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use guardian_domain_models::{WhitelistEntry, WhitelistKind};
use guardian_infra_store::WhitelistSet;
use serde_json::json;
use tracing::{instrument, warn};

use crate::state::AppState;

fn store_set(kind: WhitelistKind) -> WhitelistSet {
    match kind {
        WhitelistKind::Email => WhitelistSet::Email,
        WhitelistKind::Domain => WhitelistSet::Domain,
    }
}

#[instrument(skip(state))]
pub async fn list_whitelist(State(state): State<AppState>) -> impl IntoResponse {
    let emails = state.store().whitelist_members(WhitelistSet::Email).await;
    let domains = state.store().whitelist_members(WhitelistSet::Domain).await;
    match (emails, domains) {
        (Ok(emails), Ok(domains)) => {
            let mut entries: Vec<WhitelistEntry> = emails
                .into_iter()
                .map(|value| WhitelistEntry { kind: WhitelistKind::Email, value })
                .collect();
            entries.extend(
                domains
                    .into_iter()
                    .map(|value| WhitelistEntry { kind: WhitelistKind::Domain, value }),
            );
            Json(entries).into_response()
        }
        _ => {
            warn!("store unavailable while listing whitelist");
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": "store unavailable"}))).into_response()
        }
    }
}

#[instrument(skip(state), fields(kind = ?entry.kind))]
pub async fn add_whitelist(State(state): State<AppState>, Json(entry): Json<WhitelistEntry>) -> impl IntoResponse {
    match state.store().whitelist_add(store_set(entry.kind), &entry.value).await {
        Ok(()) => (StatusCode::OK, Json(json!({"status": "added"}))).into_response(),
        Err(e) => {
            warn!(error = %e, "store failure while adding whitelist entry");
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": "store unavailable"}))).into_response()
        }
    }
}

#[instrument(skip(state), fields(kind = ?entry.kind))]
pub async fn remove_whitelist(State(state): State<AppState>, Json(entry): Json<WhitelistEntry>) -> impl IntoResponse {
    match state.store().whitelist_remove(store_set(entry.kind), &entry.value).await {
        Ok(()) => (StatusCode::OK, Json(json!({"status": "removed"}))).into_response(),
        Err(e) => {
            warn!(error = %e, "store failure while removing whitelist entry");
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": "store unavailable"}))).into_response()
        }
    }
}
