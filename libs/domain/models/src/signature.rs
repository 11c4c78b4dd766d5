// libs/domain/models/src/signature.rs
// =================================================================
// APARATO: TYPED SIGNATURE MODEL
// RESPONSABILIDAD: DEFINICION DE LAS FIRMAS EXTRAIDAS DE UN MENSAJE
// =================================================================

use serde::{Deserialize, Serialize};

/// The extraction lane a [`TypedSignature`] came from. Each variant carries
/// its own default threshold in the matcher (see `guardian-domain-matcher`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureType {
    /// Normalizer output over text + html.
    Normalized,
    /// Raw text + html, no normalization applied.
    Raw,
    /// Deduped, normalized URL tokens joined by newline.
    Url,
    /// Repeated, lower-cased subject line.
    Subject,
    /// One signature per qualifying attachment.
    Attachment,
}

/// A fuzzy digest tagged with the lane that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypedSignature {
    /// Which extraction lane produced this digest.
    pub signature_type: SignatureType,

    /// The 74-character fuzzy digest string.
    pub digest: String,
}
