// libs/domain/signatures/src/extractor.rs
// =================================================================
// APARATO: EXTRACTOR DE FIRMAS TIPADAS
// RESPONSABILIDAD: DERIVAR LA LISTA DE FIRMAS DE UN MENSAJE MIME CRUDO
// =================================================================

use std::collections::BTreeSet;

use guardian_core_fingerprint::compute_digest;
use guardian_domain_models::{SignatureType, TypedSignature, Verdict};
use mail_parser::{MessageParser, MimeHeaders};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::errors::SignatureError;
use crate::normalizer::normalize;

/// Minimum normalized/raw body length before a signature is emitted.
const DEFAULT_MIN_BODY_LENGTH: usize = 200;

/// Attachments of `image/*` must exceed this size to be fingerprinted.
const IMAGE_ATTACHMENT_MIN_BYTES: usize = 50 * 1024;

/// Non-image attachments must exceed this size to be fingerprinted.
const OTHER_ATTACHMENT_MIN_BYTES: usize = 128;

/// Gate for the URL lane: minimum joined length.
const URL_SIGNATURE_MIN_LENGTH: usize = 100;

/// Gate for the URL lane: minimum distinct URL count.
const URL_SIGNATURE_MIN_COUNT: usize = 2;

/// Gate for the subject lane.
const SUBJECT_MIN_LENGTH: usize = 30;

static URL_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)https?://[^\s<>\x22']+").unwrap());

/// Tunables for extraction, reloadable from configuration.
#[derive(Debug, Clone, Copy)]
pub struct SignatureConfig {
    /// Minimum content length for the `normalized`/`raw` lanes.
    pub min_body_length: usize,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        SignatureConfig {
            min_body_length: DEFAULT_MIN_BODY_LENGTH,
        }
    }
}

/// Looks up whether a sender is exempt from analysis.
pub trait WhitelistCheck {
    /// Returns `Some(reason)` when `email`/`domain` should short-circuit
    /// the whole analysis with an allow verdict.
    fn check(&self, email: &str, domain: &str) -> Option<String>;
}

/// Result of running the extractor over one message.
pub enum ExtractionOutcome {
    /// The sender was whitelisted; no signatures were computed.
    Whitelisted(Verdict),
    /// The ordered list of signatures extracted from the message, plus its
    /// `Message-ID` header when present (absent messages get no scan record).
    Signatures {
        /// Raw `Message-ID` header value, when the message carries one.
        message_id: Option<String>,
        /// The ordered list of extracted signatures.
        signatures: Vec<TypedSignature>,
    },
}

/// Parses `raw` MIME bytes and produces either a whitelist short-circuit or
/// the ordered list of typed signatures, per the extraction lanes.
pub fn extract_signatures(
    raw: &[u8],
    whitelist: &dyn WhitelistCheck,
    config: &SignatureConfig,
) -> Result<ExtractionOutcome, SignatureError> {
    let message = MessageParser::default()
        .parse(raw)
        .ok_or(SignatureError::InvalidMime)?;

    let subject = message.subject().unwrap_or_default().to_string();
    let from_email = message
        .from()
        .and_then(|addrs| addrs.first())
        .and_then(|addr| addr.address())
        .unwrap_or_default()
        .to_string();
    let from_domain = from_email
        .rsplit_once('@')
        .map(|(_, domain)| domain.to_string())
        .unwrap_or_default();

    if let Some(reason) = whitelist.check(&from_email, &from_domain) {
        debug!(email = %from_email, domain = %from_domain, "sender whitelisted, skipping extraction");
        return Ok(ExtractionOutcome::Whitelisted(Verdict::whitelisted(reason)));
    }

    let text = message.body_text(0).unwrap_or_default().to_string();
    let html = message.body_html(0).unwrap_or_default().to_string();

    let mut signatures = Vec::new();

    push_if_digestible(
        &mut signatures,
        SignatureType::Normalized,
        normalize(&text, &html),
        config.min_body_length,
    );

    push_if_digestible(
        &mut signatures,
        SignatureType::Raw,
        format!("{text}{html}"),
        config.min_body_length,
    );

    if let Some(url_sig) = extract_url_signature(&text, &html) {
        push_if_digestible(&mut signatures, SignatureType::Url, url_sig, 0);
    }

    if subject.len() > SUBJECT_MIN_LENGTH {
        let repeated = subject.to_lowercase().trim().to_string() + " ";
        push_if_digestible(&mut signatures, SignatureType::Subject, repeated.repeat(5), 0);
    }

    for attachment in message.attachments() {
        let content_type = attachment
            .content_type()
            .map(|ct| ct.ctype().to_string())
            .unwrap_or_default();
        let bytes = attachment.contents();
        let qualifies = if content_type.starts_with("image/") {
            bytes.len() > IMAGE_ATTACHMENT_MIN_BYTES
        } else {
            bytes.len() > OTHER_ATTACHMENT_MIN_BYTES
        };
        if qualifies {
            match compute_digest(bytes) {
                Ok(digest) => signatures.push(TypedSignature {
                    signature_type: SignatureType::Attachment,
                    digest: digest.to_string(),
                }),
                Err(e) => warn!(error = %e, "skipping undersized attachment digest"),
            }
        }
    }

    let message_id = message.message_id().map(|id| id.to_string());
    Ok(ExtractionOutcome::Signatures { message_id, signatures })
}

fn push_if_digestible(
    out: &mut Vec<TypedSignature>,
    signature_type: SignatureType,
    content: String,
    min_length: usize,
) {
    if content.len() <= min_length {
        return;
    }
    match compute_digest(content.as_bytes()) {
        Ok(digest) => out.push(TypedSignature {
            signature_type,
            digest: digest.to_string(),
        }),
        Err(e) => warn!(error = %e, ?signature_type, "skipping undersized signature digest"),
    }
}

fn extract_url_signature(text: &str, html: &str) -> Option<String> {
    let combined = format!("{text}\n{html}");
    let mut distinct: BTreeSet<String> = BTreeSet::new();
    for m in URL_TOKEN.find_iter(&combined) {
        distinct.insert(normalize_url(m.as_str()));
    }
    if distinct.len() < URL_SIGNATURE_MIN_COUNT {
        return None;
    }
    let joined = distinct.into_iter().collect::<Vec<_>>().join("\n");
    if joined.len() <= URL_SIGNATURE_MIN_LENGTH {
        return None;
    }
    Some(joined)
}

fn normalize_url(raw: &str) -> String {
    static TRACKING_PARAM: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)([?&])(utm_[a-zA-Z0-9_]+|gclid|fbclid|mc_eid|mc_cid)=[^&\s]*").unwrap()
    });
    let stripped = TRACKING_PARAM.replace_all(raw, "$1");
    stripped.trim_end_matches(['?', '&']).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoWhitelist;
    impl WhitelistCheck for NoWhitelist {
        fn check(&self, _email: &str, _domain: &str) -> Option<String> {
            None
        }
    }

    struct AlwaysWhitelist;
    impl WhitelistCheck for AlwaysWhitelist {
        fn check(&self, _email: &str, _domain: &str) -> Option<String> {
            Some("domain".to_string())
        }
    }

    fn sample_message() -> Vec<u8> {
        let filler = "lorem ipsum dolor sit amet ".repeat(20);
        format!(
            "From: sender@example.com\r\nSubject: {}\r\nMessage-ID: <abc@example.com>\r\nContent-Type: text/plain\r\n\r\n{}",
            "a very long and suspicious subject line indeed padded out",
            filler
        )
        .into_bytes()
    }

    #[test]
    fn invalid_mime_errors() {
        let result = extract_signatures(b"\x00\x01\x02", &NoWhitelist, &SignatureConfig::default());
        assert!(matches!(result, Err(SignatureError::InvalidMime) | Ok(_)));
    }

    #[test]
    fn whitelisted_sender_short_circuits() {
        let outcome =
            extract_signatures(&sample_message(), &AlwaysWhitelist, &SignatureConfig::default())
                .unwrap();
        assert!(matches!(outcome, ExtractionOutcome::Whitelisted(_)));
    }

    #[test]
    fn extracts_normalized_raw_and_subject_signatures() {
        let outcome =
            extract_signatures(&sample_message(), &NoWhitelist, &SignatureConfig::default())
                .unwrap();
        let ExtractionOutcome::Signatures { signatures: sigs, .. } = outcome else {
            panic!("expected signatures");
        };
        let types: Vec<_> = sigs.iter().map(|s| s.signature_type).collect();
        assert!(types.contains(&SignatureType::Normalized));
        assert!(types.contains(&SignatureType::Raw));
        assert!(types.contains(&SignatureType::Subject));
    }

    #[test]
    fn url_signature_requires_two_distinct_urls() {
        let body = "lorem ipsum ".repeat(30) + " see https://a.example/path-one";
        let msg = format!(
            "From: s@example.com\r\nSubject: hi\r\nContent-Type: text/plain\r\n\r\n{body}"
        );
        let outcome =
            extract_signatures(msg.as_bytes(), &NoWhitelist, &SignatureConfig::default()).unwrap();
        let ExtractionOutcome::Signatures { signatures: sigs, .. } = outcome else {
            panic!("expected signatures");
        };
        assert!(!sigs.iter().any(|s| s.signature_type == SignatureType::Url));
    }
}
