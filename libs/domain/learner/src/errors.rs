// libs/domain/learner/src/errors.rs
// =================================================================
// APARATO: LEARNER ERRORS
// =================================================================

use thiserror::Error;

/// Infrastructure failures the report pipeline cannot route around.
/// Anything status-shaped (duplicate, missing scan data, oracle down)
/// lives in [`crate::learner::ReportOutcome`] instead.
#[derive(Error, Debug)]
pub enum LearnError {
    /// The index store failed unexpectedly mid-pipeline.
    #[error("index store unavailable: {0}")]
    Store(#[from] guardian_infra_store::StoreError),
}
