//! Pluggable record serialization

use crate::error::{FilterError, Result};
use crate::types::FilterRecord;

/// Trait for pluggable record encodings.
///
/// Built-in implementations: JSON (default) and bincode.
pub trait RecordCodec: Send + Sync + Clone + 'static {
    /// Name of the codec (for debugging/metrics)
    fn name(&self) -> &str;

    /// Encode a record to bytes
    fn encode(&self, record: &FilterRecord) -> Result<Vec<u8>>;

    /// Decode bytes to a record
    fn decode(&self, bytes: &[u8]) -> Result<FilterRecord>;
}

/// JSON codec (default)
///
/// Human-readable and easy to inspect in the store; the bit array
/// dominates the size either way.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl RecordCodec for JsonCodec {
    fn name(&self) -> &str {
        "json"
    }

    fn encode(&self, record: &FilterRecord) -> Result<Vec<u8>> {
        serde_json::to_vec(record).map_err(|e| FilterError::Serialization(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<FilterRecord> {
        serde_json::from_slice(bytes).map_err(|e| FilterError::Deserialization(e.to_string()))
    }
}

/// Bincode codec (optional)
///
/// Compact binary form. Enable with the `bincode` feature.
#[cfg(feature = "bincode")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

#[cfg(feature = "bincode")]
impl RecordCodec for BincodeCodec {
    fn name(&self) -> &str {
        "bincode"
    }

    fn encode(&self, record: &FilterRecord) -> Result<Vec<u8>> {
        bincode::serde::encode_to_vec(record, bincode::config::standard())
            .map_err(|e| FilterError::Serialization(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<FilterRecord> {
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())
            .map(|(record, _)| record)
            .map_err(|e| FilterError::Deserialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FilterRecord {
        FilterRecord {
            name: "sample".to_string(),
            bits: 100,
            hashes: 3,
            seed: 99,
            expected_insertions: 10,
            false_probability: 0.05,
            counter: 2,
            bit_bytes: vec![0xab, 0x00, 0x01, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x0f],
        }
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_round_trip() {
        let codec = JsonCodec;
        let record = sample();
        let bytes = codec.encode(&record).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), record);
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_rejects_garbage() {
        let err = JsonCodec.decode(b"not json").unwrap_err();
        assert!(matches!(err, FilterError::Deserialization(_)));
    }

    #[cfg(feature = "bincode")]
    #[test]
    fn test_bincode_round_trip() {
        let codec = BincodeCodec;
        let record = sample();
        let bytes = codec.encode(&record).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), record);
    }
}
