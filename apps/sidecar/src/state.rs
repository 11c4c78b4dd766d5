// [apps/sidecar/src/state.rs]
/*!
 * =================================================================
 * APARATO: ESTADO COMPARTIDO DEL SIDECAR
 * CLASIFICACION: APPLICATION STATE (ESTRATO L1-APP)
 * RESPONSABILIDAD: CONEXIONES COMPARTIDAS, CONFIGURACION RECARGABLE
 * Y CONTADORES DE PROCESO
 * =================================================================
 */

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use guardian_domain_learner::{Learner, LearnerConfig};
use guardian_domain_matcher::Matcher;
use guardian_domain_signatures::extractor::{SignatureConfig, WhitelistCheck};
use guardian_infra_oracle::OracleClient;
use guardian_infra_store::{GuardianStore, StoreError, WhitelistSet};
use std::collections::HashSet;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::counters::Counters;

/// Version string surfaced by `GET /status`, baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared, thread-safe handle passed to every handler and worker.
#[derive(Clone)]
pub struct AppState {
    store: GuardianStore,
    oracle: OracleClient,
    config: Arc<RwLock<Arc<Config>>>,
    config_path: Arc<PathBuf>,
    counters: Arc<Counters>,
    node_id: Uuid,
}

impl AppState {
    /// Connects to the store, mints/loads this node's identity, and wires
    /// the oracle client from `config`.
    pub async fn bootstrap(config: Config, config_path: PathBuf) -> Result<Self, guardian_infra_store::StoreError> {
        let store = GuardianStore::connect(&config.redis_host, config.redis_port).await?;
        let node_id = store.node_id().await?;
        let oracle = OracleClient::new(config.oracle_url.clone());

        info!(%node_id, "node identity established");

        Ok(AppState {
            store,
            oracle,
            config: Arc::new(RwLock::new(Arc::new(config))),
            config_path: Arc::new(config_path),
            counters: Arc::new(Counters::default()),
            node_id,
        })
    }

    /// This node's stable identity.
    pub fn node_id(&self) -> Uuid {
        self.node_id
    }

    /// The index store handle, cheap to clone.
    pub fn store(&self) -> &GuardianStore {
        &self.store
    }

    /// The oracle uplink, cheap to clone.
    pub fn oracle(&self) -> &OracleClient {
        &self.oracle
    }

    /// Process-local counters.
    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// A snapshot of the current configuration.
    pub fn config(&self) -> Arc<Config> {
        self.config.read().expect("config lock poisoned").clone()
    }

    /// Re-reads the config file and atomically swaps the snapshot. Called on
    /// `SIGHUP`.
    pub fn reload_config(&self) {
        let fresh = Config::load(&self.config_path);
        info!(
            spam_weight = fresh.spam_weight,
            ham_weight = fresh.ham_weight,
            local_retention_days = fresh.local_retention_days,
            "reloading configuration"
        );
        *self.config.write().expect("config lock poisoned") = Arc::new(fresh);
    }

    /// Builds a matcher bound to the current config snapshot.
    pub fn matcher(&self) -> Matcher {
        let config = self.config();
        Matcher::new(self.store.clone(), self.oracle.clone(), self.node_id, config.local_retention_days)
    }

    /// Builds a learner bound to the current config snapshot.
    pub fn learner(&self) -> Learner {
        let config = self.config();
        Learner::new(
            self.store.clone(),
            self.oracle.clone(),
            LearnerConfig {
                spam_weight: config.spam_weight,
                ham_weight: config.ham_weight,
                local_retention_secs: config.local_retention_days as usize * 24 * 60 * 60,
            },
        )
    }

    /// Signature extraction tunables; fixed for now, reload-ready if the
    /// config file grows a knob for it later.
    pub fn signature_config(&self) -> SignatureConfig {
        SignatureConfig::default()
    }

    /// Pulls both whitelist sets into memory so the (synchronous) signature
    /// extractor can consult them without itself doing network I/O.
    pub async fn whitelist_snapshot(&self) -> Result<InMemoryWhitelist, StoreError> {
        let domains = self.store.whitelist_members(WhitelistSet::Domain).await?;
        let emails = self.store.whitelist_members(WhitelistSet::Email).await?;
        Ok(InMemoryWhitelist {
            domains: domains.into_iter().collect(),
            emails: emails.into_iter().collect(),
        })
    }
}

/// A point-in-time copy of both whitelist sets, consulted synchronously by
/// [`guardian_domain_signatures::extractor::extract_signatures`].
pub struct InMemoryWhitelist {
    domains: HashSet<String>,
    emails: HashSet<String>,
}

impl WhitelistCheck for InMemoryWhitelist {
    fn check(&self, email: &str, domain: &str) -> Option<String> {
        if !domain.is_empty() && self.domains.contains(domain) {
            return Some(format!("domain:{domain}"));
        }
        if !email.is_empty() && self.emails.contains(email) {
            return Some(format!("email:{email}"));
        }
        None
    }
}
