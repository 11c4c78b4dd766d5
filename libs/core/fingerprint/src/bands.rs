// [libs/core/fingerprint/src/bands.rs]
// =================================================================
// APARATO: EXTRACCION DE BANDAS LSH
// RESPONSABILIDAD: DERIVAR CLAVES DE BANDA A PARTIR DEL CUERPO DEL DIGEST
// =================================================================

/// Width in characters of each band window.
const BAND_WIDTH: usize = 6;

/// Stride between successive band start positions.
const BAND_STRIDE: usize = 3;

/// Number of bands a well-formed digest always yields (positions 0,3,..,58).
const BAND_COUNT: usize = 20;

/// Extracts the 20 overlapping LSH bands from `digest`'s 64-char body.
///
/// Pure function of the string: `digest` is expected as `"T1" + 8-hex header
/// + 64-hex body`, but anything whose tail (after an optional `"T1"` prefix)
/// is at least 72 characters works, since only the last 64 of those matter.
/// Returns an empty set when the digest is shorter than that, per spec.
pub fn extract_bands(digest: &str) -> Vec<String> {
    let tail = digest.strip_prefix("T1").unwrap_or(digest);
    if tail.len() < 72 {
        return Vec::new();
    }

    let body = &tail[8..72];
    let body_bytes = body.as_bytes();

    (0..BAND_COUNT)
        .map(|i| {
            let start = i * BAND_STRIDE;
            let window = &body_bytes[start..start + BAND_WIDTH];
            format!("{}:{}", i + 1, std::str::from_utf8(window).unwrap())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::compute_digest;

    fn sample_digest() -> String {
        let bytes: Vec<u8> = (0..400u32).map(|i| (i % 251) as u8).collect();
        compute_digest(&bytes).unwrap().as_str().to_string()
    }

    #[test]
    fn yields_twenty_bands() {
        let bands = extract_bands(&sample_digest());
        assert_eq!(bands.len(), BAND_COUNT);
    }

    #[test]
    fn bands_carry_one_based_index_and_six_char_window() {
        let bands = extract_bands(&sample_digest());
        for (i, band) in bands.iter().enumerate() {
            let (idx, window) = band.split_once(':').expect("band must contain ':'");
            assert_eq!(idx.parse::<usize>().unwrap(), i + 1);
            assert_eq!(window.len(), BAND_WIDTH);
        }
    }

    #[test]
    fn short_digest_yields_no_bands() {
        assert!(extract_bands("T1ABCDEF").is_empty());
        assert!(extract_bands(&"A".repeat(71)).is_empty());
    }

    #[test]
    fn last_band_covers_the_tail_of_the_body() {
        let bands = extract_bands(&sample_digest());
        let last = bands.last().unwrap();
        assert!(last.starts_with("20:"));
    }
}
