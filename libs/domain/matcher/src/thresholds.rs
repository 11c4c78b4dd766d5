// libs/domain/matcher/src/thresholds.rs
// =================================================================
// APARATO: UMBRALES DE DECISION POR TIPO DE FIRMA
// =================================================================

use guardian_domain_models::SignatureType;

/// Hard and soft distance thresholds per signature lane.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    /// Hard threshold for `normalized` signatures.
    pub normalized: u32,
    /// Hard threshold for `raw` signatures.
    pub raw: u32,
    /// Hard threshold for `url` signatures.
    pub url: u32,
    /// Hard threshold for `subject` signatures.
    pub subject: u32,
    /// Hard threshold for `attachment` signatures.
    pub attachment: u32,
    /// Added to the hard threshold to derive the soft (advisory) bound.
    pub soft_delta: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            normalized: 70,
            raw: 60,
            url: 50,
            subject: 55,
            attachment: 45,
            soft_delta: 20,
        }
    }
}

impl Thresholds {
    /// The hard threshold `T` for `signature_type`.
    pub fn hard(&self, signature_type: SignatureType) -> u32 {
        match signature_type {
            SignatureType::Normalized => self.normalized,
            SignatureType::Raw => self.raw,
            SignatureType::Url => self.url,
            SignatureType::Subject => self.subject,
            SignatureType::Attachment => self.attachment,
        }
    }

    /// The soft threshold `S = T + soft_delta` for `signature_type`.
    pub fn soft(&self, signature_type: SignatureType) -> u32 {
        self.hard(signature_type) + self.soft_delta
    }
}

/// `confidence = 1.0 - (d/t) * 0.5`, floored at 0.5. Observability only;
/// never influences the decision.
pub fn confidence(distance: u32, threshold: u32) -> f64 {
    let raw = 1.0 - (distance as f64 / threshold as f64) * 0.5;
    raw.max(0.5)
}
