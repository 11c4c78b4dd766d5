// libs/domain/learner/src/learner.rs
// =================================================================
// APARATO: PIPELINE DE REPORTE (SPAM/HAM)
// RESPONSABILIDAD: SUPRESION DE DUPLICADOS, RESOLUCION DE BLANCO
// CANONICO Y AJUSTE DE PUNTUACION DEL INDICE DE APRENDIZAJE LOCAL
// =================================================================

use guardian_core_fingerprint::{batch_distance, extract_bands};
use guardian_domain_models::{OracleReportRequest, ReportType};
use guardian_infra_oracle::{OracleClient, ProxiedResponse};
use guardian_infra_store::{hash_message_id, GuardianStore};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::errors::LearnError;

/// Distance at or under which a candidate is folded into the reported
/// digest's target rather than treated as a distinct one.
const CANONICAL_DISTANCE_BOUND: u32 = 70;
const MIN_MATCHING_BANDS: usize = 4;

/// Runtime-tunable weights and retention, reloadable on SIGHUP.
#[derive(Debug, Clone, Copy)]
pub struct LearnerConfig {
    /// Added to `lg_s:<target>` on a spam report.
    pub spam_weight: i64,
    /// Subtracted from `lg_s:<target>` on a ham report against a known digest.
    pub ham_weight: i64,
    /// TTL applied to `lg_f:*` bands and `lg_s:*` scores touched by a report.
    pub local_retention_secs: usize,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        LearnerConfig {
            spam_weight: 1,
            ham_weight: 2,
            local_retention_secs: 15 * 24 * 60 * 60,
        }
    }
}

/// Shape of a settled `/report` outcome; the HTTP layer maps each variant
/// to its status code.
pub enum ReportOutcome {
    /// The `(message-id, report_type)` pair was already claimed within 24h.
    Duplicate,
    /// No scan record exists for this message-id.
    NoScanData,
    /// A scan record exists but carries no signatures.
    EmptyHashes,
    /// Every digest resolved to an already-known local target; the oracle
    /// was not contacted.
    SkippedKnownLocally,
    /// The oracle's `/report` response, proxied verbatim.
    Proxied(ProxiedResponse),
    /// The oracle could not be reached.
    OracleUnavailable,
}

/// Applies spam/ham corrections to the local-learning index and forwards
/// them to the remote oracle unless every digest was already known.
#[derive(Clone)]
pub struct Learner {
    store: GuardianStore,
    oracle: OracleClient,
    config: LearnerConfig,
}

impl Learner {
    /// Builds a learner bound to `store` and `oracle`.
    pub fn new(store: GuardianStore, oracle: OracleClient, config: LearnerConfig) -> Self {
        Learner { store, oracle, config }
    }

    /// Runs the full report pipeline for `message_id` under `report_type`.
    #[instrument(skip(self, message_id), fields(report_type = ?report_type))]
    pub async fn report(
        &self,
        node_id: Uuid,
        message_id: &str,
        report_type: ReportType,
    ) -> Result<ReportOutcome, LearnError> {
        let mid_hash = hash_message_id(message_id);
        let type_tag = report_type_tag(report_type);

        if !self.store.claim_report_dedup(&mid_hash, type_tag).await? {
            return Ok(ReportOutcome::Duplicate);
        }

        let record = match self.store.get_scan_record(&mid_hash).await? {
            Some(r) => r,
            None => return Ok(ReportOutcome::NoScanData),
        };
        if record.hashes.is_empty() {
            return Ok(ReportOutcome::EmptyHashes);
        }

        let mut skip_oracle_report = report_type == ReportType::Spam;

        for digest in &record.hashes {
            let target_resolution = self.resolve_canonical_target(digest).await?;
            let (target, is_known_locally) = match target_resolution {
                Some((target, distance)) if distance <= CANONICAL_DISTANCE_BOUND => (target, true),
                _ => (digest.clone(), false),
            };

            match report_type {
                ReportType::Spam => {
                    self.reinforce(&target).await?;
                    if !is_known_locally {
                        skip_oracle_report = false;
                    }
                }
                ReportType::Ham => {
                    if is_known_locally {
                        self.weaken(&target).await?;
                    }
                    // Ham against an unknown digest is a no-op.
                }
            }
        }

        if report_type == ReportType::Spam && skip_oracle_report {
            debug!("all reported digests already known locally, skipping oracle escalation");
            return Ok(ReportOutcome::SkippedKnownLocally);
        }

        let request = OracleReportRequest {
            node_id,
            signatures: record.hashes.clone(),
            report_type: type_tag.to_string(),
        };
        match self.oracle.report(&request).await {
            Ok(response) => Ok(ReportOutcome::Proxied(response)),
            Err(e) => {
                warn!(error = %e, "oracle /report unreachable");
                Ok(ReportOutcome::OracleUnavailable)
            }
        }
    }

    /// Finds the closest locally-indexed candidate for `digest`, if its
    /// bands have at least [`MIN_MATCHING_BANDS`] hits in `lg_f:*`.
    async fn resolve_canonical_target(&self, digest: &str) -> Result<Option<(String, u32)>, LearnError> {
        let bands = extract_bands(digest);
        if bands.is_empty() {
            return Ok(None);
        }
        let matched = self.store.exists_bands("lg_f:", &bands).await?;
        if matched.len() < MIN_MATCHING_BANDS {
            return Ok(None);
        }
        let candidates: Vec<String> = self
            .store
            .smembers_many("lg_f:", &matched)
            .await?
            .into_iter()
            .collect();
        let distances = batch_distance(digest, &candidates);
        Ok(distances.into_iter().min_by_key(|(_, d)| *d))
    }

    async fn reinforce(&self, target: &str) -> Result<(), LearnError> {
        self.store
            .adjust_score(target, self.config.spam_weight, self.config.local_retention_secs)
            .await?;
        let bands = extract_bands(target);
        for band in &bands {
            self.store
                .index_band("lg_f:", band, target, self.config.local_retention_secs)
                .await?;
        }
        Ok(())
    }

    async fn weaken(&self, target: &str) -> Result<(), LearnError> {
        self.store
            .adjust_score(target, -self.config.ham_weight, self.config.local_retention_secs)
            .await?;
        Ok(())
    }
}

fn report_type_tag(report_type: ReportType) -> &'static str {
    match report_type {
        ReportType::Spam => "spam",
        ReportType::Ham => "ham",
    }
}
