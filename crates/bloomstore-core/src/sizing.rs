//! Optimal bit-array and hash-count sizing
//!
//! Standard bloom filter sizing: given `n` expected insertions and a
//! target false-positive probability `p`,
//!
//! ```text
//! m = ceil(-(n * ln p) / ln(2)^2)
//! k = round((m / n) * ln 2)
//! ```

use crate::error::{FilterError, Result};

/// `ln(2)` squared.
const LN2_SQR: f64 = std::f64::consts::LN_2 * std::f64::consts::LN_2;

/// Derived dimensions of a filter: bit-array length and hash count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterShape {
    /// Bit-array length `m`
    pub bits: u64,
    /// Hash count `k`
    pub hashes: u32,
}

/// Compute the optimal `(m, k)` for `n` expected insertions at
/// false-positive probability `p`.
///
/// Pure and deterministic: identical inputs always yield the identical
/// shape, across builds and process restarts.
///
/// # Errors
///
/// `InvalidParameter` when `n == 0` or `p` is not strictly between
/// 0 and 1 (NaN included).
pub fn compute_size(expected_insertions: u64, false_probability: f64) -> Result<FilterShape> {
    if expected_insertions == 0 {
        return Err(FilterError::InvalidParameter(
            "expected_insertions must be greater than 0".to_string(),
        ));
    }
    if !(false_probability > 0.0 && false_probability < 1.0) {
        return Err(FilterError::InvalidParameter(format!(
            "false_probability must be in (0, 1), got {false_probability}"
        )));
    }

    let n = expected_insertions as f64;
    let bits = (-(n * false_probability.ln()) / LN2_SQR).ceil() as u64;
    let bits = bits.max(1);

    let hashes = ((bits as f64 / n) * std::f64::consts::LN_2).round() as u32;
    let hashes = hashes.max(1);

    Ok(FilterShape { bits, hashes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_shape() {
        // 10k insertions at 1% needs ~9.6 bits per element and 7 hashes.
        let shape = compute_size(10_000, 0.01).unwrap();
        assert_eq!(shape.bits, 95_851);
        assert_eq!(shape.hashes, 7);
    }

    #[test]
    fn test_deterministic() {
        let a = compute_size(10_000, 0.01).unwrap();
        let b = compute_size(10_000, 0.01).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_tighter_rate_needs_more_bits() {
        let loose = compute_size(1_000, 0.1).unwrap();
        let tight = compute_size(1_000, 0.001).unwrap();
        assert!(tight.bits > loose.bits);
        assert!(tight.hashes > loose.hashes);
    }

    #[test]
    fn test_hashes_clamped_to_one() {
        // Very permissive p drives k below 1 before clamping.
        let shape = compute_size(1_000, 0.99).unwrap();
        assert_eq!(shape.hashes, 1);
        assert!(shape.bits >= 1);
    }

    #[test]
    fn test_rejects_zero_insertions() {
        let err = compute_size(0, 0.01).unwrap_err();
        assert!(matches!(err, FilterError::InvalidParameter(_)));
    }

    #[test]
    fn test_rejects_bad_probability() {
        for p in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            let err = compute_size(100, p).unwrap_err();
            assert!(matches!(err, FilterError::InvalidParameter(_)), "p = {p}");
        }
    }
}
