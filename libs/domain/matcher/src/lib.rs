// [libs/domain/matcher/src/lib.rs]
#![deny(missing_docs)]

//! # APARATO: MATCHER STRATUM ROOT
//! CLASIFICACION: DOMAIN LOGIC (ESTRATO L2)
//! RESPONSABILIDAD: DECISION allow/soft_spam/spam SOBRE FIRMAS TIPADAS
//!
//! Orquesta cuatro fuentes de evidencia en orden de costo creciente: cache
//! exacta de decisiones del oraculo, LSH sobre esa misma cache, indice de
//! aprendizaje local y, por ultimo, consulta en vivo al oraculo remoto.
//! No hace I/O de red propia fuera de `guardian-infra-oracle` ni persiste
//! nada fuera de `guardian-infra-store`.

/// Error types for the matcher pipeline.
pub mod errors;
/// Core matching logic and analysis outcome types.
pub mod matcher;
/// Confidence thresholds used by the matcher.
pub mod thresholds;

pub use crate::errors::MatchError;
pub use crate::matcher::{canonical_distance_bound, AnalysisOutcome, AnalysisTelemetry, Matcher};
pub use crate::thresholds::{confidence, Thresholds};

#[cfg(test)]
mod tests {
    use super::*;
    use guardian_domain_models::SignatureType;

    #[test]
    fn soft_threshold_is_hard_plus_delta() {
        let thresholds = Thresholds::default();
        assert_eq!(
            thresholds.soft(SignatureType::Normalized),
            thresholds.hard(SignatureType::Normalized) + thresholds.soft_delta
        );
    }

    #[test]
    fn confidence_floors_at_half() {
        assert_eq!(confidence(1000, 10), 0.5);
    }

    #[test]
    fn confidence_is_one_at_zero_distance() {
        assert_eq!(confidence(0, 70), 1.0);
    }

    #[test]
    fn three_bands_never_reach_local_match_threshold() {
        // MIN_MATCHING_BANDS is 4; this documents the boundary the matcher
        // relies on without re-exporting the store's band machinery here.
        let bands_found = 3;
        assert!(bands_found < 4, "a 3-band match must not be treated as a local hit");
    }
}
