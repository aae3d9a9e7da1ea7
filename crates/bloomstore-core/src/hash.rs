//! Deterministic double-hashing family
//!
//! Each filter owns a `HashFamily` that maps element bytes to exactly
//! `k` bit positions in `[0, m)` via double hashing: two independent
//! SipHash-1-3 base hashes `h1`, `h2`, with the i-th position being
//! `(h1 + i * h2) mod m`.
//!
//! The family is fully determined by `(m, k, seed)`, so a filter
//! restored from a persisted record reproduces the exact position sets
//! of the process that wrote it.

use std::hash::Hasher;

use siphasher::sip::SipHasher13;

/// Fixed key for deriving a filter's default seed from its name.
const NAME_SEED_KEYS: (u64, u64) = (0x6c79_666c_6578_6921, 0x626c_6f6f_6d73_7472);

/// Generator of `k` bit positions per element.
#[derive(Debug, Clone, Copy)]
pub struct HashFamily {
    bits: u64,
    hashes: u32,
    seed: u64,
}

impl HashFamily {
    /// Create a family over a bit array of length `bits`, producing
    /// `hashes` positions per element, keyed by `seed`.
    pub fn new(bits: u64, hashes: u32, seed: u64) -> Self {
        debug_assert!(bits > 0);
        debug_assert!(hashes > 0);
        Self { bits, hashes, seed }
    }

    /// Derive the default seed for a filter from its name.
    ///
    /// Stable across process restarts, so a filter re-opened by name
    /// keeps its hash family without persisting anything extra.
    pub fn seed_for_name(name: &str) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(NAME_SEED_KEYS.0, NAME_SEED_KEYS.1);
        hasher.write(name.as_bytes());
        hasher.finish()
    }

    /// The two independent base hashes for an element.
    fn base_hashes(&self, data: &[u8]) -> (u64, u64) {
        let (k0, k1) = expand_seed(self.seed);
        let (k2, k3) = expand_seed(self.seed ^ 0x9e37_79b9_7f4a_7c15);

        let mut h1 = SipHasher13::new_with_keys(k0, k1);
        h1.write(data);
        let mut h2 = SipHasher13::new_with_keys(k2, k3);
        h2.write(data);

        (h1.finish(), h2.finish())
    }

    /// The `k` bit positions for an element, each in `[0, bits)`.
    pub fn positions(&self, data: &[u8]) -> Positions {
        let (h1, h2) = self.base_hashes(data);
        Positions {
            h1,
            h2,
            bits: self.bits,
            remaining: self.hashes,
            i: 0,
        }
    }
}

/// Iterator over the bit positions of a single element.
#[derive(Debug, Clone)]
pub struct Positions {
    h1: u64,
    h2: u64,
    bits: u64,
    remaining: u32,
    i: u64,
}

impl Iterator for Positions {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.remaining == 0 {
            return None;
        }
        let pos = self.h1.wrapping_add(self.i.wrapping_mul(self.h2)) % self.bits;
        self.i += 1;
        self.remaining -= 1;
        Some(pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Positions {}

/// Expand a 64-bit seed into a SipHash key pair (splitmix64).
fn expand_seed(seed: u64) -> (u64, u64) {
    (splitmix64(seed), splitmix64(seed.wrapping_add(1)))
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}
