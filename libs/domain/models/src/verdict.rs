// libs/domain/models/src/verdict.rs
// =================================================================
// APARATO: VERDICT MODEL
// RESPONSABILIDAD: RESULTADO DE UN ANALISIS DE MENSAJE
// =================================================================

use serde::{Deserialize, Serialize};

/// Final action a message analysis settles on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// No matching evidence found; message passes through.
    Allow,
    /// Confirmed spam; caller should reject/quarantine.
    Spam,
    /// Below the hard threshold but within the soft delta; advisory only.
    SoftSpam,
}

/// The outcome of running the matcher's decision procedure over a message's
/// full set of typed signatures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// The settled action.
    pub action: Action,

    /// Which layer/rule produced the action, e.g. `"oracle_cache_match"`,
    /// `"local_spam"`, `"whitelisted"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// True when a local-learning band match existed even though no
    /// signature crossed its hard threshold.
    pub proximity_match: bool,

    /// Distance of the matching candidate, when one was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<u32>,

    /// Confidence score derived from distance and threshold spread.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Which signature type produced the deciding match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_type: Option<String>,

    /// True when a sender whitelist entry short-circuited the analysis.
    pub whitelisted: bool,

    /// The whitelist entry that matched, e.g. `"domain:example.com"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Every digest computed during this analysis, in extraction order.
    pub hashes: Vec<String>,
}

impl Verdict {
    /// The deterministic verdict a whitelisted sender always receives: no
    /// signatures computed, no scan record stored.
    pub fn whitelisted(reason: impl Into<String>) -> Self {
        Verdict {
            action: Action::Allow,
            label: Some("whitelisted".to_string()),
            proximity_match: false,
            distance: None,
            confidence: None,
            match_type: None,
            whitelisted: true,
            reason: Some(reason.into()),
            hashes: Vec::new(),
        }
    }

    /// A plain allow with no match of any kind.
    pub fn allow(hashes: Vec<String>) -> Self {
        Verdict {
            action: Action::Allow,
            label: None,
            proximity_match: false,
            distance: None,
            confidence: None,
            match_type: None,
            whitelisted: false,
            reason: None,
            hashes,
        }
    }
}
