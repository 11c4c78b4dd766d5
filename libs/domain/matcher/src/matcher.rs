// libs/domain/matcher/src/matcher.rs
// =================================================================
// APARATO: PROCEDIMIENTO DE DECISION DE CUATRO CAPAS
// RESPONSABILIDAD: RESOLVER allow/soft_spam/spam PARA UN CONJUNTO DE
// FIRMAS TIPADAS, CONSULTANDO EL INDICE LOCAL Y EL ORACULO REMOTO
// =================================================================

use guardian_core_fingerprint::{batch_distance, extract_bands};
use guardian_domain_models::{
    Action, OracleAnalyzeRequest, SignatureType, TypedSignature, Verdict,
};
use guardian_infra_oracle::OracleClient;
use guardian_infra_store::{CachedVerdict, GuardianStore};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::thresholds::{confidence, Thresholds};

const MIN_MATCHING_BANDS: usize = 4;
const CANONICAL_DISTANCE_BOUND: u32 = 70;

/// A confirmed or advisory match found during the decision procedure.
#[derive(Debug, Clone)]
struct MatchInfo {
    label: String,
    distance: Option<u32>,
    confidence: Option<f64>,
    match_type: SignatureType,
}

enum LayerOutcome {
    /// Layers 1, 2 and 4 terminate the whole analysis on a spam verdict.
    EndAnalysisSpam(MatchInfo),
    /// Layer 3's local spam verdict settles the result but analysis keeps
    /// processing the remaining signatures.
    SpamContinue(MatchInfo),
    /// Upgrades the running best result to `soft_spam`.
    SoftUpgrade(MatchInfo),
    /// Band proximity existed without a qualifying match.
    ProximityOnly,
    /// Nothing of interest for this signature.
    NoMatch,
}

/// Per-analysis counters the caller folds into its process-local stats.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisTelemetry {
    /// `action == allow` but a layer found `proximity_match`.
    pub partial_match: bool,
    /// Final action was `spam`, from any layer.
    pub spam_confirmed: bool,
    /// Layer 1 resolved a cached `spam` verdict.
    pub cached_positive: bool,
    /// Layer 1 resolved a cached non-spam verdict.
    pub cached_negative: bool,
    /// Layer 3 resolved a local-learning spam verdict.
    pub local_spam: bool,
}

/// Result of running [`Matcher::analyze`].
pub struct AnalysisOutcome {
    /// The settled verdict.
    pub verdict: Verdict,
    /// Counters to fold into process-local stats.
    pub telemetry: AnalysisTelemetry,
}

/// Runs the four-layer decision procedure over a message's typed
/// signatures, consulting the local index store and falling back to the
/// remote oracle only when local evidence is inconclusive.
#[derive(Clone)]
pub struct Matcher {
    store: GuardianStore,
    oracle: OracleClient,
    thresholds: Thresholds,
    node_id: Uuid,
    local_retention_secs: usize,
}

impl Matcher {
    /// Builds a matcher bound to `store` and `oracle`, scoped to `node_id`.
    pub fn new(store: GuardianStore, oracle: OracleClient, node_id: Uuid, local_retention_days: u32) -> Self {
        Matcher {
            store,
            oracle,
            thresholds: Thresholds::default(),
            node_id,
            local_retention_secs: local_retention_days as usize * 24 * 60 * 60,
        }
    }

    /// Runs the full decision procedure over `signatures`, in extraction
    /// order, and produces a settled [`Verdict`] plus stat counters.
    #[instrument(skip_all, fields(signature_count = signatures.len()))]
    pub async fn analyze(&self, signatures: &[TypedSignature]) -> AnalysisOutcome {
        let hashes: Vec<String> = signatures.iter().map(|s| s.digest.clone()).collect();

        let mut telemetry = AnalysisTelemetry::default();
        let mut proximity_match = false;
        let mut soft_best: Option<MatchInfo> = None;
        let mut settled_spam: Option<MatchInfo> = None;

        for sig in signatures {
            match self.process_signature(sig, &mut telemetry).await {
                LayerOutcome::EndAnalysisSpam(info) => {
                    telemetry.spam_confirmed = true;
                    return AnalysisOutcome {
                        verdict: spam_verdict(info, hashes),
                        telemetry,
                    };
                }
                LayerOutcome::SpamContinue(info) => {
                    telemetry.local_spam = true;
                    if settled_spam.is_none() {
                        settled_spam = Some(info);
                    }
                }
                LayerOutcome::SoftUpgrade(info) => {
                    proximity_match = true;
                    let better = soft_best
                        .as_ref()
                        .map(|b| info.distance.unwrap_or(u32::MAX) < b.distance.unwrap_or(u32::MAX))
                        .unwrap_or(true);
                    if better {
                        soft_best = Some(info);
                    }
                }
                LayerOutcome::ProximityOnly => {
                    proximity_match = true;
                }
                LayerOutcome::NoMatch => {}
            }
        }

        if let Some(info) = settled_spam {
            telemetry.spam_confirmed = true;
            return AnalysisOutcome {
                verdict: spam_verdict(info, hashes),
                telemetry,
            };
        }

        if let Some(info) = soft_best {
            return AnalysisOutcome {
                verdict: Verdict {
                    action: Action::SoftSpam,
                    label: Some(info.label),
                    proximity_match: true,
                    distance: info.distance,
                    confidence: info.confidence,
                    match_type: Some(format!("{:?}", info.match_type).to_lowercase()),
                    whitelisted: false,
                    reason: None,
                    hashes,
                },
                telemetry,
            };
        }

        telemetry.partial_match = proximity_match;
        AnalysisOutcome {
            verdict: Verdict {
                action: Action::Allow,
                label: None,
                proximity_match,
                distance: None,
                confidence: None,
                match_type: None,
                whitelisted: false,
                reason: None,
                hashes,
            },
            telemetry,
        }
    }

    async fn process_signature(&self, sig: &TypedSignature, telemetry: &mut AnalysisTelemetry) -> LayerOutcome {
        let t = self.thresholds.hard(sig.signature_type);
        let s = self.thresholds.soft(sig.signature_type);

        // Layer 1 — exact oracle-decision cache.
        match self.store.get_oracle_cache(&sig.digest).await {
            Ok(Some(cached)) => {
                if cached.action == "spam" {
                    telemetry.cached_positive = true;
                    return LayerOutcome::EndAnalysisSpam(MatchInfo {
                        label: cached.label.unwrap_or_else(|| "oracle_cache_exact".to_string()),
                        distance: cached.distance,
                        confidence: cached.confidence,
                        match_type: sig.signature_type,
                    });
                }
                telemetry.cached_negative = true;
                return LayerOutcome::NoMatch;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "oracle-decision cache lookup failed, proceeding without it");
            }
        }

        let bands = extract_bands(&sig.digest);
        if bands.is_empty() {
            return LayerOutcome::NoMatch;
        }

        // Layer 2 — oracle-cache LSH.
        if let Ok(existing) = self.store.exists_bands("oc_f:", &bands).await {
            if existing.len() >= MIN_MATCHING_BANDS {
                if let Ok(candidates) = self.store.smembers_many("oc_f:", &existing).await {
                    let candidates: Vec<String> = candidates.into_iter().collect();
                    let distances = batch_distance(&sig.digest, &candidates);
                    if let Some((_, d)) = distances.iter().min_by_key(|(_, d)| **d) {
                        if *d <= t {
                            return LayerOutcome::EndAnalysisSpam(MatchInfo {
                                label: "oracle_cache_match".to_string(),
                                distance: Some(*d),
                                confidence: Some(confidence(*d, t)),
                                match_type: sig.signature_type,
                            });
                        }
                        if *d <= s {
                            return LayerOutcome::SoftUpgrade(MatchInfo {
                                label: "oracle_cache_match".to_string(),
                                distance: Some(*d),
                                confidence: Some(confidence(*d, t)),
                                match_type: sig.signature_type,
                            });
                        }
                    }
                }
            }
        }

        // Layer 3 — local-learning LSH.
        match self.store.exists_bands("lg_f:", &bands).await {
            Ok(existing) if existing.len() >= MIN_MATCHING_BANDS => {
                for band in &existing {
                    if let Err(e) = self.store.refresh_band_ttl("lg_f:", band, self.local_retention_secs).await {
                        warn!(error = %e, "failed to refresh local-learning band TTL");
                    }
                }

                let candidates: Vec<String> = self
                    .store
                    .smembers_many("lg_f:", &existing)
                    .await
                    .unwrap_or_default()
                    .into_iter()
                    .collect();
                let mut distances: Vec<(String, u32)> = batch_distance(&sig.digest, &candidates).into_iter().collect();
                distances.sort_by_key(|(_, d)| *d);

                for (candidate, d) in &distances {
                    if *d > t {
                        continue;
                    }
                    let score = self.store.get_score(candidate).await.unwrap_or(0);
                    if score > 0 {
                        debug!(candidate = %candidate, distance = d, "local learning spam match");
                        return LayerOutcome::SpamContinue(MatchInfo {
                            label: "local_spam".to_string(),
                            distance: Some(*d),
                            confidence: Some(confidence(*d, t)),
                            match_type: sig.signature_type,
                        });
                    }
                }

                if let Some((candidate, d)) = distances.iter().find(|(_, d)| *d <= s) {
                    let score = self.store.get_score(candidate).await.unwrap_or(0);
                    if score > 0 {
                        return LayerOutcome::SoftUpgrade(MatchInfo {
                            label: "local_spam".to_string(),
                            distance: Some(*d),
                            confidence: Some(confidence(*d, t)),
                            match_type: sig.signature_type,
                        });
                    }
                }

                return LayerOutcome::ProximityOnly;
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "local-learning band lookup failed"),
        }

        // Layer 4 — global oracle LSH.
        match self.store.exists_bands("mi_f:", &bands).await {
            Ok(existing) if existing.len() >= MIN_MATCHING_BANDS => self.consult_oracle(sig, &bands, t).await,
            Ok(_) => LayerOutcome::NoMatch,
            Err(e) => {
                warn!(error = %e, "global band lookup failed");
                LayerOutcome::NoMatch
            }
        }
    }

    async fn consult_oracle(&self, sig: &TypedSignature, bands: &[String], t: u32) -> LayerOutcome {
        let request = OracleAnalyzeRequest {
            node_id: self.node_id,
            email_body_hash: sig.digest.clone(),
        };

        match self.oracle.analyze(&request).await {
            Ok(response) if response.result.action == "spam" => {
                let cached = CachedVerdict {
                    action: "spam".to_string(),
                    label: response.result.label.clone(),
                    distance: response.result.distance,
                    confidence: None,
                };
                if let Err(e) = self.store.set_oracle_cache(&sig.digest, &cached).await {
                    warn!(error = %e, "failed to cache oracle spam verdict");
                }
                for band in bands {
                    if let Err(e) = self.store.index_band("oc_f:", band, &sig.digest, 60 * 60).await {
                        warn!(error = %e, "failed to index oracle-cache band");
                    }
                }
                LayerOutcome::EndAnalysisSpam(MatchInfo {
                    label: response.result.label.unwrap_or_else(|| "oracle".to_string()),
                    distance: response.result.distance.or(Some(t)),
                    confidence: response.result.distance.map(|d| confidence(d, t)),
                    match_type: sig.signature_type,
                })
            }
            Ok(response) => {
                let cached = CachedVerdict {
                    action: "allow".to_string(),
                    label: response.result.label,
                    distance: response.result.distance,
                    confidence: None,
                };
                if let Err(e) = self.store.set_oracle_cache(&sig.digest, &cached).await {
                    warn!(error = %e, "failed to cache oracle allow verdict");
                }
                LayerOutcome::ProximityOnly
            }
            Err(e) => {
                warn!(error = %e, "oracle /analyze unreachable, falling back to proximity-only");
                LayerOutcome::ProximityOnly
            }
        }
    }
}

fn spam_verdict(info: MatchInfo, hashes: Vec<String>) -> Verdict {
    Verdict {
        action: Action::Spam,
        label: Some(info.label),
        proximity_match: false,
        distance: info.distance,
        confidence: info.confidence,
        match_type: Some(format!("{:?}", info.match_type).to_lowercase()),
        whitelisted: false,
        reason: None,
        hashes,
    }
}

/// Distance bound under which a report's nearest candidate is treated as
/// the canonical target rather than a novel digest (see the learner).
pub const fn canonical_distance_bound() -> u32 {
    CANONICAL_DISTANCE_BOUND
}
