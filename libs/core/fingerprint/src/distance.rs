// [libs/core/fingerprint/src/distance.rs]
// =================================================================
// APARATO: DISTANCIA ENTRE DIGESTS DIFUSOS
// RESPONSABILIDAD: COMPARACION POR PARES Y POR LOTES (PARALELA)
// =================================================================

use std::collections::HashMap;

use rayon::prelude::*;

use crate::digest::decode_body;

/// A digest split into its parsed parts, built once and reused across many
/// comparisons against the same reference (spec requires candidates be
/// parsed once, not re-parsed per comparison).
struct ParsedDigest {
    checksum: u8,
    length_byte: u8,
    q_ratio: [u8; 2],
    codes: [u8; 128],
}

fn parse(raw: &str) -> Option<ParsedDigest> {
    let tail = raw.strip_prefix("T1").unwrap_or(raw);
    if tail.len() < 72 {
        return None;
    }
    let header = &tail[0..8];
    let body = &tail[8..72];

    let checksum = u8::from_str_radix(&header[0..2], 16).ok()?;
    let length_byte = u8::from_str_radix(&header[2..4], 16).ok()?;
    let q_ratio_a = u8::from_str_radix(&header[4..6], 16).ok()?;
    let q_ratio_b = u8::from_str_radix(&header[6..8], 16).ok()?;
    let codes = decode_body(body)?;

    Some(ParsedDigest {
        checksum,
        length_byte,
        q_ratio: [q_ratio_a, q_ratio_b],
        codes,
    })
}

/// Integer distance between two parsed digests: sum of 2-bit code deltas
/// across the 128 body buckets, plus a header penalty for length/checksum/
/// quartile-ratio divergence. Symmetric and zero iff the digests are
/// byte-for-byte identical.
fn distance_parsed(a: &ParsedDigest, b: &ParsedDigest) -> u32 {
    let body_delta: u32 = a
        .codes
        .iter()
        .zip(b.codes.iter())
        .map(|(&x, &y)| x.abs_diff(y) as u32)
        .sum();

    let length_delta = a.length_byte.abs_diff(b.length_byte) as u32;
    let checksum_penalty = if a.checksum == b.checksum { 0 } else { 1 };
    let q_ratio_delta: u32 = a
        .q_ratio
        .iter()
        .zip(b.q_ratio.iter())
        .map(|(&x, &y)| x.abs_diff(y) as u32 / 16)
        .sum();

    body_delta + length_delta + checksum_penalty + q_ratio_delta
}

/// Computes the distance between two digest strings. Returns `None` if
/// either side is malformed (callers in the matcher treat this as "skip,
/// do not error", per spec).
pub fn distance(a: &str, b: &str) -> Option<u32> {
    let pa = parse(a)?;
    let pb = parse(b)?;
    Some(distance_parsed(&pa, &pb))
}

/// Computes `reference`'s distance to every digest in `candidates` in
/// parallel, parsing `reference` exactly once. Malformed candidates are
/// dropped from the result map rather than surfaced as errors.
pub fn batch_distance(reference: &str, candidates: &[String]) -> HashMap<String, u32> {
    let Some(parsed_reference) = parse(reference) else {
        return HashMap::new();
    };

    candidates
        .par_iter()
        .filter_map(|candidate| {
            let parsed_candidate = parse(candidate)?;
            Some((candidate.clone(), distance_parsed(&parsed_reference, &parsed_candidate)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::compute_digest;

    fn digest_of(seed: u8) -> String {
        let bytes: Vec<u8> = (0..500u32).map(|i| ((i as u8).wrapping_add(seed))).collect();
        compute_digest(&bytes).unwrap().as_str().to_string()
    }

    #[test]
    fn self_distance_is_zero() {
        let d = digest_of(7);
        assert_eq!(distance(&d, &d), Some(0));
    }

    #[test]
    fn distance_is_symmetric() {
        let a = digest_of(1);
        let b = digest_of(99);
        assert_eq!(distance(&a, &b), distance(&b, &a));
    }

    #[test]
    fn malformed_operand_yields_none() {
        assert_eq!(distance("not-a-digest", &digest_of(1)), None);
    }

    #[test]
    fn batch_distance_skips_malformed_candidates_silently() {
        let reference = digest_of(3);
        let candidates = vec![digest_of(3), "garbage".to_string(), digest_of(50)];
        let result = batch_distance(&reference, &candidates);
        assert_eq!(result.len(), 2);
        assert_eq!(result.get(&reference), Some(&0));
    }
}
