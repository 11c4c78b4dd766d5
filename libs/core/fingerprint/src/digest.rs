// [libs/core/fingerprint/src/digest.rs]
/*!
 * APARATO: FUZZY DIGEST COMPUTATION (TLSH-SHAPED)
 * RESPONSABILIDAD: PRODUCIR UN DIGEST DE 74 CARACTERES A PARTIR DE BYTES
 *
 * Ver SPEC_FULL.md seccion C para la justificacion de por que este motor
 * reimplementa el algoritmo en lugar de depender de una crate externa.
 */

use crate::errors::FingerprintError;
use crate::pearson;
use tracing::debug;

/// Minimum byte length TLSH-style digests require to be meaningful.
pub const MIN_DIGEST_INPUT_LENGTH: usize = 50;

/// Number of histogram buckets (matches upstream TLSH's 128 buckets).
const BUCKET_COUNT: usize = 128;

/// Number of quantization salts sampled per sliding window (the "triangle" of
/// the upstream algorithm).
const WINDOW_SALTS: [u8; 3] = [2, 3, 5];

/// A validated TLSH-shaped fuzzy digest: `"T1"` + 8 hex header + 64 hex body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest(String);

impl Digest {
    /// Wraps `raw` as a [`Digest`] iff it is well-formed per spec.md section 3
    /// (length >= 72 after stripping the optional `"T1"` prefix).
    pub fn parse(raw: &str) -> Option<Self> {
        let body_and_header = raw.strip_prefix("T1").unwrap_or(raw);
        if body_and_header.len() < 72 {
            return None;
        }
        Some(Digest(raw.to_ascii_uppercase()))
    }

    /// Raw string form, e.g. `"T1A1B2C3D4..."`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes a fuzzy digest over `content`.
///
/// # Errors
/// Returns [`FingerprintError::InputTooShort`] when `content` is below
/// [`MIN_DIGEST_INPUT_LENGTH`].
pub fn compute_digest(content: &[u8]) -> Result<Digest, FingerprintError> {
    if content.len() < MIN_DIGEST_INPUT_LENGTH {
        return Err(FingerprintError::InputTooShort(
            content.len(),
            MIN_DIGEST_INPUT_LENGTH,
        ));
    }

    let histogram = build_histogram(content);
    let (q1, q2, q3) = quartiles(&histogram);
    let codes = quantize(&histogram, q1, q2, q3);
    let body = encode_body(&codes);

    let checksum = pearson::hash(1, content);
    let length_byte = length_log_byte(content.len());
    let q_ratio_bytes = quartile_ratio_bytes(q1, q2, q3);

    let header = format!(
        "{:02X}{:02X}{:02X}{:02X}",
        checksum, length_byte, q_ratio_bytes[0], q_ratio_bytes[1]
    );

    let digest = format!("T1{header}{body}");
    debug_assert_eq!(digest.len(), 74);
    debug!(len = content.len(), "computed fuzzy digest");

    Ok(Digest(digest))
}

/// Slides a 5-byte window (stride 1) over `content`, sampling three
/// Pearson-hashed "triangles" of the last four bytes per window and
/// incrementing the corresponding bucket in a 128-slot histogram.
fn build_histogram(content: &[u8]) -> [u32; BUCKET_COUNT] {
    let mut histogram = [0u32; BUCKET_COUNT];
    if content.len() < 5 {
        return histogram;
    }

    for window in content.windows(5) {
        let c = &window[1..5]; // four-byte quartet trailing the window
        let triangles: [[u8; 3]; 3] = [
            [c[0], c[1], c[2]],
            [c[0], c[1], c[3]],
            [c[0], c[2], c[3]],
        ];
        for (salt, triangle) in WINDOW_SALTS.iter().zip(triangles.iter()) {
            let bucket = pearson::hash(*salt, triangle) as usize % BUCKET_COUNT;
            histogram[bucket] = histogram[bucket].saturating_add(1);
        }
    }
    histogram
}

/// Returns (q1, q2, q3) over the non-zero-aware sorted histogram, the way
/// upstream TLSH derives quantization boundaries.
fn quartiles(histogram: &[u32; BUCKET_COUNT]) -> (u32, u32, u32) {
    let mut sorted = *histogram;
    sorted.sort_unstable();
    let q1 = sorted[BUCKET_COUNT / 4];
    let q2 = sorted[BUCKET_COUNT / 2];
    let q3 = sorted[(BUCKET_COUNT * 3) / 4];
    (q1, q2, q3)
}

/// Quantizes each bucket count into a 2-bit code (0..=3) against the quartile
/// boundaries.
fn quantize(histogram: &[u32; BUCKET_COUNT], q1: u32, q2: u32, q3: u32) -> [u8; BUCKET_COUNT] {
    let mut codes = [0u8; BUCKET_COUNT];
    for (i, &count) in histogram.iter().enumerate() {
        codes[i] = if count <= q1 {
            0
        } else if count <= q2 {
            1
        } else if count <= q3 {
            2
        } else {
            3
        };
    }
    codes
}

/// Packs 128 2-bit codes into 64 hex characters (32 bytes, 4 bits/char).
fn encode_body(codes: &[u8; BUCKET_COUNT]) -> String {
    let mut body = String::with_capacity(64);
    for pair in codes.chunks(2) {
        let nibble = (pair[0] << 2) | pair[1];
        body.push_str(&format!("{:X}", nibble));
    }
    body
}

/// Decodes 64 hex body characters back into 128 2-bit codes. Returns `None`
/// on any non-hex character — callers treat this as a malformed digest.
pub(crate) fn decode_body(body: &str) -> Option<[u8; BUCKET_COUNT]> {
    if body.len() != 64 {
        return None;
    }
    let mut codes = [0u8; BUCKET_COUNT];
    for (i, ch) in body.chars().enumerate() {
        let nibble = ch.to_digit(16)? as u8;
        codes[i * 2] = (nibble >> 2) & 0b11;
        codes[i * 2 + 1] = nibble & 0b11;
    }
    Some(codes)
}

/// Log-scaled length byte: compresses arbitrarily large inputs into one byte
/// while preserving coarse ordering, same rationale as TLSH's length bucket.
fn length_log_byte(len: usize) -> u8 {
    let scaled = (len as f64).ln().max(0.0) * 8.0;
    scaled.min(255.0) as u8
}

/// Two bytes summarizing the spread between quartile boundaries.
fn quartile_ratio_bytes(q1: u32, q2: u32, q3: u32) -> [u8; 2] {
    let ratio_a = if q3 == 0 { 0 } else { ((q1 * 255) / q3.max(1)).min(255) } as u8;
    let ratio_b = if q3 == 0 { 0 } else { ((q2 * 255) / q3.max(1)).min(255) } as u8;
    [ratio_a, ratio_b]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filler(n: usize) -> Vec<u8> {
        (0..n).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn rejects_short_input() {
        let err = compute_digest(b"too short").unwrap_err();
        assert_eq!(err, FingerprintError::InputTooShort(9, MIN_DIGEST_INPUT_LENGTH));
    }

    #[test]
    fn produces_well_formed_shape() {
        let digest = compute_digest(&filler(500)).unwrap();
        let s = digest.as_str();
        assert_eq!(s.len(), 74);
        assert!(s.starts_with("T1"));
        assert!(s.chars().skip(2).all(|c| c.is_ascii_hexdigit() && (c.is_ascii_digit() || c.is_ascii_uppercase())));
    }

    #[test]
    fn deterministic_for_same_input() {
        let a = compute_digest(&filler(400)).unwrap();
        let b = compute_digest(&filler(400)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(Digest::parse("T1ABCD").is_none());
        assert!(Digest::parse(&"A".repeat(72)).is_some());
    }
}
