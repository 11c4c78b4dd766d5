// [libs/core/fingerprint/src/pearson.rs]
//! Pearson hashing primitive used to build the digest's bucket histogram.
//!
//! Same shape as a classic Pearson table lookup: an 8-bit permutation table
//! folds an arbitrary byte sequence down to a single byte by repeated
//! `table[prev ^ byte]`. The fuzzy digest below runs this three times per
//! sliding window (with distinct salts) the way upstream TLSH derives three
//! bucket indices from each 5-byte window.

const fn build_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0usize;
    while i < 256 {
        // Any multiplier coprime with 256 yields a bijection; 167 and 53
        // were picked for reasonable avalanche, not cryptographic strength.
        table[i] = ((i * 167 + 53) % 256) as u8;
        i += 1;
    }
    table
}

static TABLE: [u8; 256] = build_table();

/// Folds `bytes` into a single byte via repeated table lookups, seeded by `salt`.
#[inline]
pub fn hash(salt: u8, bytes: &[u8]) -> u8 {
    let mut h = TABLE[salt as usize];
    for &b in bytes {
        h = TABLE[(h ^ b) as usize];
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(hash(1, b"hello"), hash(1, b"hello"));
    }

    #[test]
    fn salt_changes_output() {
        assert_ne!(hash(1, b"hello"), hash(2, b"hello"));
    }

    #[test]
    fn table_is_a_permutation() {
        let mut seen = [false; 256];
        for &v in TABLE.iter() {
            assert!(!seen[v as usize], "value {v} repeated in Pearson table");
            seen[v as usize] = true;
        }
    }
}
