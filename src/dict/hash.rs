//! Seeded hash helpers exported by the original (`dictGenHashFunction`,
//! `dictGenCaseHashFunction`), wrapping a SipHash-family mixer over an
//! explicit seed. `fxhash` (the bundled default hasher, see
//! [`super::entry::FxDictType`]) is seedless, so these use `siphasher`
//! instead, same as the seeded content-addressing hash in
//! `triblespace-tribles-rust`.

use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// A ≥16-byte hash function seed (spec.md §6: "byte array of ≥16 bytes").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashSeed([u8; 16]);

impl HashSeed {
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub fn random() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    fn hasher(&self) -> SipHasher13 {
        let k0 = u64::from_le_bytes(self.0[0..8].try_into().unwrap());
        let k1 = u64::from_le_bytes(self.0[8..16].try_into().unwrap());
        SipHasher13::new_with_keys(k0, k1)
    }
}

impl Default for HashSeed {
    fn default() -> Self {
        Self([0u8; 16])
    }
}

/// `dictGenHashFunction` — seeded SipHash-family mix of `data`.
pub fn gen_hash_function(seed: &HashSeed, data: &[u8]) -> u64 {
    let mut hasher = seed.hasher();
    hasher.write(data);
    hasher.finish()
}

/// `dictGenCaseHashFunction` — same as [`gen_hash_function`] but
/// case-insensitive over ASCII bytes, for case-folded key lookups.
pub fn gen_case_hash_function(seed: &HashSeed, data: &[u8]) -> u64 {
    let mut hasher = seed.hasher();
    let mut buf = [0u8; 64];
    let mut chunk_start = 0;
    while chunk_start < data.len() {
        let chunk_len = (data.len() - chunk_start).min(buf.len());
        for (dst, src) in buf[..chunk_len]
            .iter_mut()
            .zip(&data[chunk_start..chunk_start + chunk_len])
        {
            *dst = src.to_ascii_lowercase();
        }
        hasher.write(&buf[..chunk_len]);
        chunk_start += chunk_len;
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_same_seed() {
        let seed = HashSeed::from_bytes(*b"0123456789abcdef");
        assert_eq!(
            gen_hash_function(&seed, b"hello"),
            gen_hash_function(&seed, b"hello")
        );
    }

    #[test]
    fn different_seeds_differ_with_high_probability() {
        let a = HashSeed::from_bytes(*b"0123456789abcdef");
        let b = HashSeed::from_bytes(*b"fedcba9876543210");
        assert_ne!(gen_hash_function(&a, b"hello"), gen_hash_function(&b, b"hello"));
    }

    #[test]
    fn case_hash_is_case_insensitive() {
        let seed = HashSeed::default();
        assert_eq!(
            gen_case_hash_function(&seed, b"Hello"),
            gen_case_hash_function(&seed, b"hello")
        );
    }
}
