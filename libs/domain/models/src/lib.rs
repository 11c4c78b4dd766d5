// libs/domain/models/src/lib.rs
//! Shared DTOs for the Guardian workspace: digest-bearing signatures,
//! verdicts, the sidecar's HTTP contracts and the oracle's wire contracts.
//! Every crate above this one in the stratification depends on these types
//! instead of redefining its own.

pub mod http;
pub mod oracle;
pub mod signature;
pub mod verdict;

pub use http::{
    AnalyzeResponse, DuplicateReportResponse, ReportRequest, ReportType, StatusResponse,
    WhitelistEntry, WhitelistKind,
};
pub use oracle::{
    OracleAnalyzeRequest, OracleAnalyzeResponse, OracleAnalyzeResult, OracleReportRequest,
    OracleStatsRequest, OracleSyncRequest, OracleSyncResponse, SyncAction, SyncOp,
};
pub use signature::{SignatureType, TypedSignature};
pub use verdict::{Action, Verdict};
