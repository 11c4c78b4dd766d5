// [apps/sidecar/src/counters.rs]
/*!
 * =================================================================
 * APARATO: CONTADORES DE PROCESO
 * RESPONSABILIDAD: SEIS CONTADORES ATOMICOS COMPARTIDOS ENTRE EL
 * CAMINO DE PETICIONES Y EL WORKER DE ESTADISTICAS
 * =================================================================
 */

use std::sync::atomic::{AtomicU64, Ordering};

use guardian_domain_matcher::AnalysisTelemetry;
use guardian_domain_models::OracleStatsRequest;
use uuid::Uuid;

/// Process-local counters flushed to the oracle's `/stats` every 10 minutes.
#[derive(Debug, Default)]
pub struct Counters {
    scanned: AtomicU64,
    partial_match: AtomicU64,
    spam_confirmed: AtomicU64,
    cached_positive: AtomicU64,
    cached_negative: AtomicU64,
    local_spam: AtomicU64,
}

impl Counters {
    /// Always counts the scan; folds in the per-layer telemetry flags.
    pub fn record(&self, telemetry: &AnalysisTelemetry) {
        self.scanned.fetch_add(1, Ordering::Relaxed);
        if telemetry.partial_match {
            self.partial_match.fetch_add(1, Ordering::Relaxed);
        }
        if telemetry.spam_confirmed {
            self.spam_confirmed.fetch_add(1, Ordering::Relaxed);
        }
        if telemetry.cached_positive {
            self.cached_positive.fetch_add(1, Ordering::Relaxed);
        }
        if telemetry.cached_negative {
            self.cached_negative.fetch_add(1, Ordering::Relaxed);
        }
        if telemetry.local_spam {
            self.local_spam.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Atomically swaps every counter to zero and returns the pre-swap
    /// values as an oracle `/stats` request.
    pub fn drain(&self, node_id: Uuid) -> OracleStatsRequest {
        OracleStatsRequest {
            node_id,
            scanned_count: self.scanned.swap(0, Ordering::Relaxed),
            partial_match_count: self.partial_match.swap(0, Ordering::Relaxed),
            spam_confirmed_count: self.spam_confirmed.swap(0, Ordering::Relaxed),
            cached_positive_count: self.cached_positive.swap(0, Ordering::Relaxed),
            cached_negative_count: self.cached_negative.swap(0, Ordering::Relaxed),
            local_spam_count: self.local_spam.swap(0, Ordering::Relaxed),
        }
    }

    /// Adds a previously drained snapshot back in, used when a `/stats`
    /// flush fails and the counts must not be lost (at-least-once).
    pub fn restore(&self, snapshot: &OracleStatsRequest) {
        self.scanned.fetch_add(snapshot.scanned_count, Ordering::Relaxed);
        self.partial_match.fetch_add(snapshot.partial_match_count, Ordering::Relaxed);
        self.spam_confirmed.fetch_add(snapshot.spam_confirmed_count, Ordering::Relaxed);
        self.cached_positive.fetch_add(snapshot.cached_positive_count, Ordering::Relaxed);
        self.cached_negative.fetch_add(snapshot.cached_negative_count, Ordering::Relaxed);
        self.local_spam.fetch_add(snapshot.local_spam_count, Ordering::Relaxed);
    }

    /// Renders the six counters as Prometheus text exposition for `/metrics`.
    pub fn render_prometheus(&self) -> String {
        format!(
            "# TYPE mi_guardian_scanned_total counter\n\
             mi_guardian_scanned_total {}\n\
             # TYPE mi_guardian_partial_match_total counter\n\
             mi_guardian_partial_match_total {}\n\
             # TYPE mi_guardian_spam_confirmed_total counter\n\
             mi_guardian_spam_confirmed_total {}\n\
             # TYPE mi_guardian_cached_positive_total counter\n\
             mi_guardian_cached_positive_total {}\n\
             # TYPE mi_guardian_cached_negative_total counter\n\
             mi_guardian_cached_negative_total {}\n\
             # TYPE mi_guardian_local_spam_total counter\n\
             mi_guardian_local_spam_total {}\n",
            self.scanned.load(Ordering::Relaxed),
            self.partial_match.load(Ordering::Relaxed),
            self.spam_confirmed.load(Ordering::Relaxed),
            self.cached_positive.load(Ordering::Relaxed),
            self.cached_negative.load(Ordering::Relaxed),
            self.local_spam.load(Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_resets_to_zero_and_returns_prior_values() {
        let counters = Counters::default();
        counters.record(&AnalysisTelemetry {
            partial_match: false,
            spam_confirmed: true,
            cached_positive: false,
            cached_negative: false,
            local_spam: true,
        });
        let snapshot = counters.drain(Uuid::nil());
        assert_eq!(snapshot.scanned_count, 1);
        assert_eq!(snapshot.spam_confirmed_count, 1);
        assert_eq!(snapshot.local_spam_count, 1);
        assert_eq!(counters.drain(Uuid::nil()).scanned_count, 0);
    }

    #[test]
    fn restore_adds_snapshot_back_in() {
        let counters = Counters::default();
        counters.record(&AnalysisTelemetry::default());
        let snapshot = counters.drain(Uuid::nil());
        counters.restore(&snapshot);
        assert_eq!(counters.drain(Uuid::nil()).scanned_count, 1);
    }
}
