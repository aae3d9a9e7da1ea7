//! Single-filter engine
//!
//! A [`Filter`] owns one bit array and answers add/contains for it.
//! Mutation contract:
//!
//! - `add` and `contains` run concurrently: bit sets are atomic ORs,
//!   bit reads are word-atomic loads, and membership information only
//!   grows (bits never go 1 -> 0 outside `clear`).
//! - `clear` and snapshotting take the write gate, so they never
//!   interleave with an in-flight `add`; a cleared filter cannot
//!   resurrect half-written elements.
//! - The add counter is atomic and approximate. It counts `add` calls,
//!   not distinct elements, so it is an upper bound on cardinality.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::bits::AtomicBitSet;
use crate::error::{FilterError, Result};
use crate::hash::HashFamily;
use crate::sizing::{FilterShape, compute_size};
use crate::traits::FilterElement;
use crate::types::{FilterRecord, FilterStats};

/// A concurrent bloom filter with fixed dimensions.
///
/// `(m, k, seed)` are fixed for the lifetime of the instance; resizing
/// means creating a new filter. Shared across threads behind an `Arc`.
pub struct Filter {
    expected_insertions: u64,
    false_probability: f64,
    seed: u64,
    hashes: u32,
    family: HashFamily,
    bits: AtomicBitSet,
    counter: AtomicU64,
    /// add/contains hold this shared; clear and snapshot exclusively.
    gate: RwLock<()>,
}

impl Filter {
    /// Allocate a zeroed filter sized for `expected_insertions` at
    /// target false-positive rate `false_probability`, keyed by `seed`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` from sizing when `expected_insertions == 0`
    /// or `false_probability` is outside (0, 1).
    pub fn new(expected_insertions: u64, false_probability: f64, seed: u64) -> Result<Self> {
        let FilterShape { bits, hashes } = compute_size(expected_insertions, false_probability)?;
        Ok(Self {
            expected_insertions,
            false_probability,
            seed,
            hashes,
            family: HashFamily::new(bits, hashes, seed),
            bits: AtomicBitSet::new(bits),
            counter: AtomicU64::new(0),
            gate: RwLock::new(()),
        })
    }

    /// Add an element.
    ///
    /// Idempotent with respect to membership: adding the same element
    /// twice leaves the bit array unchanged, though the approximate
    /// counter still increments. Inserting more than the configured
    /// expected count is allowed and degrades the real false-positive
    /// rate gradually; it is not an error.
    ///
    /// # Errors
    ///
    /// `HashInput` if the element cannot be converted to bytes.
    pub fn add<E: FilterElement + ?Sized>(&self, element: &E) -> Result<()> {
        let bytes = element.element_bytes()?;
        self.add_bytes(&bytes);
        Ok(())
    }

    /// Add a raw byte element. Infallible.
    pub fn add_bytes(&self, bytes: &[u8]) {
        let _guard = self.gate.read();
        for position in self.family.positions(bytes) {
            self.bits.set(position);
        }
        self.counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Whether an element is possibly in the set.
    ///
    /// `false` means definitely not present; `true` means present or a
    /// false positive, bounded in expectation by the configured rate
    /// while actual insertions stay at or below the expected count.
    /// Never returns `false` for an element that was added.
    ///
    /// # Errors
    ///
    /// `HashInput` if the element cannot be converted to bytes.
    pub fn contains<E: FilterElement + ?Sized>(&self, element: &E) -> Result<bool> {
        let bytes = element.element_bytes()?;
        Ok(self.contains_bytes(&bytes))
    }

    /// Membership test on a raw byte element. Infallible.
    pub fn contains_bytes(&self, bytes: &[u8]) -> bool {
        let _guard = self.gate.read();
        self.family
            .positions(bytes)
            .all(|position| self.bits.get(position))
    }

    /// Zero the bit array and counter in place, preserving dimensions
    /// and seed. Waits for in-flight adds to finish first.
    pub fn clear(&self) {
        let _guard = self.gate.write();
        self.bits.zero();
        self.counter.store(0, Ordering::Relaxed);
    }

    /// Approximate number of `add` calls.
    ///
    /// An upper bound on distinct elements: duplicate adds inflate it
    /// even though membership is unaffected.
    pub fn approx_len(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    /// Whether no bit is set.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bit-array length `m`.
    pub fn bits(&self) -> u64 {
        self.bits.len()
    }

    /// Hash count `k`.
    pub fn hashes(&self) -> u32 {
        self.hashes
    }

    /// Hash family seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Point-in-time statistics.
    pub fn stats(&self) -> FilterStats {
        FilterStats {
            bits: self.bits.len(),
            hashes: self.hashes,
            approx_items: self.approx_len(),
            bits_set: self.bits.count_ones(),
            expected_insertions: self.expected_insertions,
            false_probability: self.false_probability,
        }
    }

    /// Capture a durable snapshot under the write gate, quiescing
    /// concurrent adds so the record is internally consistent.
    pub fn snapshot(&self, name: &str) -> FilterRecord {
        let _guard = self.gate.write();
        FilterRecord {
            name: name.to_string(),
            bits: self.bits.len(),
            hashes: self.hashes,
            seed: self.seed,
            expected_insertions: self.expected_insertions,
            false_probability: self.false_probability,
            counter: self.counter.load(Ordering::Relaxed),
            bit_bytes: self.bits.to_bytes(),
        }
    }

    /// Reconstruct a filter from a persisted record.
    ///
    /// The restored filter answers membership identically to the one
    /// that wrote the record.
    ///
    /// # Errors
    ///
    /// `Deserialization` on dimension/byte-length mismatch,
    /// `InvalidParameter` if the recorded dimensions are degenerate.
    pub fn from_record(record: &FilterRecord) -> Result<Self> {
        if record.bits == 0 || record.hashes == 0 {
            return Err(FilterError::InvalidParameter(format!(
                "record for '{}' has degenerate dimensions (m = {}, k = {})",
                record.name, record.bits, record.hashes
            )));
        }
        let bits = AtomicBitSet::from_bytes(&record.bit_bytes, record.bits)?;
        Ok(Self {
            expected_insertions: record.expected_insertions,
            false_probability: record.false_probability,
            seed: record.seed,
            hashes: record.hashes,
            family: HashFamily::new(record.bits, record.hashes, record.seed),
            bits,
            counter: AtomicU64::new(record.counter),
            gate: RwLock::new(()),
        })
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("bits", &self.bits.len())
            .field("hashes", &self.hashes)
            .field("seed", &self.seed)
            .field("approx_items", &self.approx_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_no_false_negatives() {
        let filter = Filter::new(1_000, 0.01, 1).unwrap();
        for i in 0..1_000u64 {
            filter.add(&i).unwrap();
        }
        for i in 0..1_000u64 {
            assert!(filter.contains(&i).unwrap(), "lost element {i}");
        }
    }

    #[test]
    fn test_false_positive_rate_within_bound() {
        let filter = Filter::new(10_000, 0.01, 7).unwrap();
        for i in 0..10_000u64 {
            filter.add(&i).unwrap();
        }

        let false_positives = (10_000..20_000u64)
            .filter(|i| filter.contains(i).unwrap())
            .count();

        // Target is 1%; only fail well outside the binomial noise band.
        assert!(
            false_positives <= 300,
            "false positive rate too high: {false_positives} / 10000"
        );
    }

    #[test]
    fn test_duplicate_add_identical_bits() {
        let once = Filter::new(100, 0.01, 3).unwrap();
        once.add("dup").unwrap();

        let twice = Filter::new(100, 0.01, 3).unwrap();
        twice.add("dup").unwrap();
        twice.add("dup").unwrap();

        assert_eq!(once.snapshot("a").bit_bytes, twice.snapshot("a").bit_bytes);
        assert_eq!(once.approx_len(), 1);
        assert_eq!(twice.approx_len(), 2);
    }

    #[test]
    fn test_clear_resets_membership_and_counter() {
        let filter = Filter::new(100, 0.01, 0).unwrap();
        for i in 0..50u64 {
            filter.add(&i).unwrap();
        }
        assert!(!filter.is_empty());

        filter.clear();
        assert!(filter.is_empty());
        assert_eq!(filter.approx_len(), 0);
        assert_eq!(filter.stats().bits_set, 0);
        // Dimensions survive a clear.
        assert_eq!(filter.bits(), Filter::new(100, 0.01, 0).unwrap().bits());
    }

    #[test]
    fn test_snapshot_round_trip_preserves_membership() {
        let filter = Filter::new(500, 0.01, 9).unwrap();
        for i in 0..500u64 {
            filter.add(&i).unwrap();
        }

        let record = filter.snapshot("round_trip");
        assert_eq!(record.bit_bytes.len() as u64, filter.bits().div_ceil(8));

        let restored = Filter::from_record(&record).unwrap();
        assert_eq!(restored.approx_len(), 500);
        for i in 0..500u64 {
            assert!(restored.contains(&i).unwrap(), "lost element {i}");
        }
    }

    #[test]
    fn test_from_record_rejects_degenerate_dimensions() {
        let mut record = Filter::new(10, 0.1, 0).unwrap().snapshot("bad");
        record.hashes = 0;
        let err = Filter::from_record(&record).unwrap_err();
        assert!(matches!(err, FilterError::InvalidParameter(_)));
    }

    #[test]
    fn test_stats() {
        let filter = Filter::new(1_000, 0.01, 5).unwrap();
        filter.add("x").unwrap();

        let stats = filter.stats();
        assert_eq!(stats.approx_items, 1);
        assert!(stats.bits_set > 0);
        assert!(stats.bits_set <= stats.hashes as u64);
        assert!(stats.load_factor() > 0.0);
        assert!(stats.estimated_fpp() < 0.01);
    }

    #[test]
    fn test_concurrent_disjoint_adds_all_positive() {
        let filter = Arc::new(Filter::new(8_000, 0.01, 11).unwrap());

        let mut handles = Vec::new();
        for t in 0..8u64 {
            let filter = filter.clone();
            handles.push(std::thread::spawn(move || {
                for i in (t * 1_000)..((t + 1) * 1_000) {
                    filter.add(&i).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(filter.approx_len(), 8_000);
        for i in 0..8_000u64 {
            assert!(filter.contains(&i).unwrap(), "lost element {i}");
        }
    }

    #[test]
    fn test_concurrent_contains_during_adds() {
        let filter = Arc::new(Filter::new(10_000, 0.01, 13).unwrap());

        let writer = {
            let filter = filter.clone();
            std::thread::spawn(move || {
                for i in 0..5_000u64 {
                    filter.add(&i).unwrap();
                }
            })
        };
        // Readers must never see a false negative for already-added
        // elements, whatever the interleaving.
        let reader = {
            let filter = filter.clone();
            std::thread::spawn(move || {
                for i in 0..5_000u64 {
                    let _ = filter.contains(&i).unwrap();
                }
            })
        };

        writer.join().unwrap();
        reader.join().unwrap();

        for i in 0..5_000u64 {
            assert!(filter.contains(&i).unwrap());
        }
    }
}
