//! Persisted filter record

use serde::{Deserialize, Serialize};

/// The durable form of a filter: everything needed to reconstruct
/// identical membership answers in another process.
///
/// `bit_bytes` is the packed bit array, `ceil(bits / 8)` bytes with
/// zero padding in the final byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRecord {
    /// Filter name (unique key within its store)
    pub name: String,
    /// Bit-array length `m`
    pub bits: u64,
    /// Hash count `k`
    pub hashes: u32,
    /// Hash family seed
    pub seed: u64,
    /// Configured expected insertions (`n`)
    pub expected_insertions: u64,
    /// Configured false-positive target (`p`)
    pub false_probability: f64,
    /// Approximate add counter at snapshot time
    pub counter: u64,
    /// Packed bit array
    pub bit_bytes: Vec<u8>,
}
