// [libs/domain/learner/src/lib.rs]
#![deny(missing_docs)]

//! # APARATO: LEARNER STRATUM ROOT
//! CLASIFICACION: DOMAIN LOGIC (ESTRATO L2)
//! RESPONSABILIDAD: PIPELINE DE REPORTE SPAM/HAM
//!
//! Convierte correcciones humanas (`/report`) en ajustes del indice de
//! aprendizaje local y, cuando aporta informacion nueva, las reenvia al
//! oraculo remoto. Nunca bloquea sobre el oraculo mas alla del timeout
//! fijo de `guardian-infra-oracle`.

/// Error types for the learner pipeline.
pub mod errors;
/// Core learner types and report-handling logic.
pub mod learner;

pub use crate::errors::LearnError;
pub use crate::learner::{Learner, LearnerConfig, ReportOutcome};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_match_spec_defaults() {
        let config = LearnerConfig::default();
        assert_eq!(config.spam_weight, 1);
        assert_eq!(config.ham_weight, 2);
        assert_eq!(config.local_retention_secs, 15 * 24 * 60 * 60);
    }
}
