//! Lock-free bit array
//!
//! Fixed-length bit array backed by atomic u64 words. Bits only move
//! 0 -> 1 under concurrent use (`set` is an atomic OR), which is what
//! makes relaxed ordering sufficient for bloom filter reads: a query
//! can never observe a torn word, only an older all-or-some-bits view,
//! and membership information grows monotonically.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{FilterError, Result};

/// A fixed-length concurrent bit array.
pub struct AtomicBitSet {
    words: Box<[AtomicU64]>,
    /// Logical number of bits; the last word may be partially used.
    len: u64,
}

impl AtomicBitSet {
    /// Create a zeroed bit array of `len` bits.
    pub fn new(len: u64) -> Self {
        assert!(len > 0, "bit array length must be greater than 0");
        let nwords = len.div_ceil(64) as usize;
        let words: Box<[AtomicU64]> = (0..nwords)
            .map(|_| AtomicU64::new(0))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { words, len }
    }

    /// Logical number of bits.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether no bit is set.
    pub fn is_empty(&self) -> bool {
        self.count_ones() == 0
    }

    /// Set the bit at `index`. Idempotent; returns whether the bit was
    /// newly set.
    pub fn set(&self, index: u64) -> bool {
        debug_assert!(index < self.len);
        let word = (index / 64) as usize;
        let mask = 1u64 << (index % 64);
        self.words[word].fetch_or(mask, Ordering::Relaxed) & mask == 0
    }

    /// Whether the bit at `index` is set.
    pub fn get(&self, index: u64) -> bool {
        debug_assert!(index < self.len);
        let word = (index / 64) as usize;
        let mask = 1u64 << (index % 64);
        self.words[word].load(Ordering::Relaxed) & mask != 0
    }

    /// Reset every bit to zero.
    pub fn zero(&self) {
        for word in self.words.iter() {
            word.store(0, Ordering::Relaxed);
        }
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u64 {
        self.words
            .iter()
            .map(|w| w.load(Ordering::Relaxed).count_ones() as u64)
            .sum()
    }

    /// Pack into `ceil(len / 8)` little-endian bytes. Trailing pad bits
    /// beyond `len` are always zero.
    pub fn to_bytes(&self) -> Vec<u8> {
        let nbytes = self.len.div_ceil(8) as usize;
        let mut bytes = Vec::with_capacity(nbytes);
        for word in self.words.iter() {
            bytes.extend_from_slice(&word.load(Ordering::Relaxed).to_le_bytes());
        }
        bytes.truncate(nbytes);
        bytes
    }

    /// Reconstruct from the packed form produced by [`to_bytes`].
    ///
    /// # Errors
    ///
    /// `Deserialization` if the byte length does not match `len` or a
    /// pad bit beyond `len` is set.
    ///
    /// [`to_bytes`]: AtomicBitSet::to_bytes
    pub fn from_bytes(bytes: &[u8], len: u64) -> Result<Self> {
        let expected = len.div_ceil(8) as usize;
        if bytes.len() != expected {
            return Err(FilterError::Deserialization(format!(
                "bit array of {len} bits needs {expected} bytes, got {}",
                bytes.len()
            )));
        }
        let pad_bits = (8 - (len % 8) as u32) % 8;
        if pad_bits != 0 {
            let last = bytes[expected - 1];
            if last >> (8 - pad_bits) != 0 {
                return Err(FilterError::Deserialization(
                    "non-zero padding bits in packed bit array".to_string(),
                ));
            }
        }

        let set = Self::new(len);
        for (i, chunk) in bytes.chunks(8).enumerate() {
            let mut buf = [0u8; 8];
            buf[..chunk.len()].copy_from_slice(chunk);
            set.words[i].store(u64::from_le_bytes(buf), Ordering::Relaxed);
        }
        Ok(set)
    }
}

impl std::fmt::Debug for AtomicBitSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomicBitSet")
            .field("len", &self.len)
            .field("ones", &self.count_ones())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get() {
        let bits = AtomicBitSet::new(130);
        assert!(!bits.get(0));
        assert!(bits.set(0));
        assert!(bits.get(0));
        // Setting an already-set bit is a no-op.
        assert!(!bits.set(0));

        assert!(bits.set(129));
        assert!(bits.get(129));
        assert!(!bits.get(64));
        assert_eq!(bits.count_ones(), 2);
    }

    #[test]
    fn test_is_empty() {
        let bits = AtomicBitSet::new(64);
        assert!(bits.is_empty());
        bits.set(5);
        assert!(!bits.is_empty());
        bits.zero();
        assert!(bits.is_empty());
    }

    #[test]
    fn test_zero() {
        let bits = AtomicBitSet::new(100);
        bits.set(3);
        bits.set(77);
        bits.zero();
        assert_eq!(bits.count_ones(), 0);
        assert!(!bits.get(3));
        assert!(!bits.get(77));
    }

    #[test]
    fn test_packed_round_trip() {
        let bits = AtomicBitSet::new(100);
        for i in [0, 7, 8, 63, 64, 99] {
            bits.set(i);
        }

        let bytes = bits.to_bytes();
        assert_eq!(bytes.len(), 13); // ceil(100 / 8)

        let restored = AtomicBitSet::from_bytes(&bytes, 100).unwrap();
        for i in 0..100 {
            assert_eq!(bits.get(i), restored.get(i), "bit {i}");
        }
    }

    #[test]
    fn test_from_bytes_rejects_wrong_length() {
        let err = AtomicBitSet::from_bytes(&[0u8; 12], 100).unwrap_err();
        assert!(matches!(err, FilterError::Deserialization(_)));
    }

    #[test]
    fn test_from_bytes_rejects_dirty_padding() {
        // 100 bits = 13 bytes with 4 pad bits in the last byte.
        let mut bytes = vec![0u8; 13];
        bytes[12] = 0xf0;
        let err = AtomicBitSet::from_bytes(&bytes, 100).unwrap_err();
        assert!(matches!(err, FilterError::Deserialization(_)));
    }

    #[test]
    fn test_concurrent_set_loses_nothing() {
        use std::sync::Arc;

        let bits = Arc::new(AtomicBitSet::new(4096));
        let mut handles = Vec::new();
        for t in 0..8u64 {
            let bits = bits.clone();
            handles.push(std::thread::spawn(move || {
                for i in (t * 512)..((t + 1) * 512) {
                    bits.set(i);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(bits.count_ones(), 4096);
    }
}
