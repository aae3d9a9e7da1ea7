//! Filter statistics

/// Point-in-time statistics for a single filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterStats {
    /// Bit-array length `m`
    pub bits: u64,
    /// Hash count `k`
    pub hashes: u32,
    /// Approximate number of `add` calls. An upper bound on distinct
    /// elements: duplicate adds inflate it.
    pub approx_items: u64,
    /// Number of set bits
    pub bits_set: u64,
    /// Configured expected insertions
    pub expected_insertions: u64,
    /// Configured false-positive target
    pub false_probability: f64,
}

impl FilterStats {
    /// Fraction of bits set, in [0, 1]. Values near 0.5 mean the
    /// filter is approaching its design capacity; above 0.5 the real
    /// false-positive rate exceeds the configured target.
    pub fn load_factor(&self) -> f64 {
        if self.bits == 0 {
            0.0
        } else {
            self.bits_set as f64 / self.bits as f64
        }
    }

    /// Estimated current false-positive probability, `load_factor^k`.
    /// Zero for a filter with no bits set.
    pub fn estimated_fpp(&self) -> f64 {
        if self.bits_set == 0 {
            return 0.0;
        }
        self.load_factor().powi(self.hashes as i32)
    }

    /// Fraction of the configured capacity consumed by adds.
    pub fn fill_ratio(&self) -> f64 {
        if self.expected_insertions == 0 {
            0.0
        } else {
            self.approx_items as f64 / self.expected_insertions as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let stats = FilterStats::default();
        assert_eq!(stats.load_factor(), 0.0);
        assert_eq!(stats.estimated_fpp(), 0.0);
        assert_eq!(stats.fill_ratio(), 0.0);
    }

    #[test]
    fn test_load_factor() {
        let stats = FilterStats {
            bits: 1000,
            hashes: 2,
            bits_set: 500,
            ..Default::default()
        };
        assert!((stats.load_factor() - 0.5).abs() < f64::EPSILON);
        assert!((stats.estimated_fpp() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fill_ratio() {
        let stats = FilterStats {
            expected_insertions: 100,
            approx_items: 25,
            ..Default::default()
        };
        assert!((stats.fill_ratio() - 0.25).abs() < f64::EPSILON);
    }
}
