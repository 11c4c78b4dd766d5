// libs/domain/models/src/http.rs
// =================================================================
// APARATO: CONTRATOS HTTP EXTERNOS
// RESPONSABILIDAD: CUERPOS DE PETICION/RESPUESTA DEL SIDECAR
// =================================================================

use serde::{Deserialize, Serialize};

use crate::verdict::Verdict;

/// `GET /status` response body.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    /// This node's stable identity, minted on first boot.
    pub node_id: uuid::Uuid,
    /// Last band-sync sequence number applied from the oracle.
    pub current_seq: i64,
    /// Build/version string, surfaced for operator diagnostics.
    pub version: String,
}

/// `POST /analyze` response body; shares shape with [`Verdict`].
pub type AnalyzeResponse = Verdict;

/// Report classification requested by `POST /report`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    /// The referenced message should have been caught as spam.
    Spam,
    /// The referenced message was wrongly caught; it is legitimate.
    Ham,
}

/// `POST /report` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportRequest {
    /// Message-ID header of the message being reported.
    #[serde(rename = "message-id")]
    pub message_id: String,
    /// Direction of the correction.
    pub report_type: ReportType,
}

/// `POST /report` duplicate-suppression response body (409).
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateReportResponse {
    /// Always `"duplicate"`.
    pub status: &'static str,
}

impl Default for DuplicateReportResponse {
    fn default() -> Self {
        DuplicateReportResponse { status: "duplicate" }
    }
}

/// Whitelist entry kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhitelistKind {
    /// Matches the full sender email address.
    Email,
    /// Matches the sender's domain only.
    Domain,
}

/// `POST /whitelist`, `GET /whitelist`, `DELETE /whitelist` request body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WhitelistEntry {
    /// Which set this entry belongs to.
    #[serde(rename = "type")]
    pub kind: WhitelistKind,
    /// The email address or domain string.
    pub value: String,
}
