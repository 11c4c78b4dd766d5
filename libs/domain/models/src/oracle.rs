// libs/domain/models/src/oracle.rs
// =================================================================
// APARATO: CONTRATO DE RED DEL ORACULO REMOTO
// RESPONSABILIDAD: CUERPOS DE PETICION/RESPUESTA DEL SERVICIO EXTERNO
// =================================================================

use serde::{Deserialize, Serialize};

/// `POST /analyze` request to the oracle.
#[derive(Debug, Clone, Serialize)]
pub struct OracleAnalyzeRequest {
    /// This node's identity.
    pub node_id: uuid::Uuid,
    /// The fuzzy digest being escalated.
    pub email_body_hash: String,
}

/// Inner `result` object of the oracle's `/analyze` response.
#[derive(Debug, Clone, Deserialize)]
pub struct OracleAnalyzeResult {
    /// `"spam"` or `"allow"` as reported by the oracle.
    pub action: String,
    /// Free-form label describing why, when present.
    pub label: Option<String>,
    /// Whether the oracle found band proximity without a hard match.
    pub proximity_match: bool,
    /// Distance of the oracle's best match, when one exists.
    pub distance: Option<u32>,
}

/// Envelope around [`OracleAnalyzeResult`].
#[derive(Debug, Clone, Deserialize)]
pub struct OracleAnalyzeResponse {
    /// The nested decision payload.
    pub result: OracleAnalyzeResult,
}

/// `POST /report` request to the oracle.
#[derive(Debug, Clone, Serialize)]
pub struct OracleReportRequest {
    /// This node's identity.
    pub node_id: uuid::Uuid,
    /// Every signature digest computed for the reported message.
    pub signatures: Vec<String>,
    /// Direction of the correction, serialized as `"spam"`/`"ham"`.
    pub report_type: String,
}

/// `POST /sync` request to the oracle.
#[derive(Debug, Clone, Serialize)]
pub struct OracleSyncRequest {
    /// This node's identity.
    pub node_id: uuid::Uuid,
    /// The last sequence number this node applied.
    pub current_seq: i64,
    /// This node's build/version string.
    pub version: String,
}

/// Instruction carried in a sync response: add or remove a set of bands
/// from the global index.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncOp {
    /// `"add"` or `"del"`.
    pub action: String,
    /// The band keys this op applies to.
    pub bands: Vec<String>,
}

/// `POST /sync` response from the oracle.
#[derive(Debug, Clone, Deserialize)]
pub struct OracleSyncResponse {
    /// Sequence number to persist locally after applying `ops`.
    pub new_seq: i64,
    /// Whether this is an incremental delta or a full rebuild signal.
    pub action: SyncAction,
    /// Present when `action` is `UPDATE_DELTA`.
    #[serde(default)]
    pub ops: Vec<SyncOp>,
}

/// Sync response discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SyncAction {
    /// Apply `ops` incrementally.
    #[serde(rename = "UPDATE_DELTA")]
    UpdateDelta,
    /// Discard the local index and rebuild from scratch.
    #[serde(rename = "RESET_DB")]
    ResetDb,
}

/// `POST /stats` request to the oracle; a flush of this node's
/// process-local counters.
#[derive(Debug, Clone, Serialize, Default)]
pub struct OracleStatsRequest {
    /// This node's identity.
    pub node_id: uuid::Uuid,
    /// Total messages analyzed since the last flush.
    pub scanned_count: u64,
    /// Messages that hit `proximity_match` without a hard verdict.
    pub partial_match_count: u64,
    /// Messages confirmed spam by any layer.
    pub spam_confirmed_count: u64,
    /// Messages resolved from the oracle-decision cache.
    pub cached_positive_count: u64,
    /// Messages resolved as allow from a negative cache entry.
    pub cached_negative_count: u64,
    /// Messages resolved purely from the local-learning index.
    pub local_spam_count: u64,
}
