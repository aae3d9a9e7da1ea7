//! Error types for filter operations

use thiserror::Error;

/// Main error type for all filter operations
#[derive(Error, Debug, Clone)]
pub enum FilterError {
    /// Invalid sizing parameters or filter name at create time
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A live filter or persisted record already exists under this name
    #[error("filter already exists: {0}")]
    AlreadyExists(String),

    /// No filter registered under this name
    #[error("filter not found: {0}")]
    NotFound(String),

    /// Element could not be converted to bytes for hashing
    #[error("hash input error: {0}")]
    HashInput(String),

    /// Record encoding failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record decoding failed
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Storage backend failed or is unreachable
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Storage operation exceeded its deadline
    #[error("operation timed out")]
    Timeout,
}

impl FilterError {
    /// Whether retrying the operation (with backoff) can succeed.
    ///
    /// Only failures at the storage collaborator boundary are retryable;
    /// parameter and lifecycle errors never are.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FilterError::BackendUnavailable(_) | FilterError::Timeout
        )
    }
}

/// Result type alias for filter operations
pub type Result<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FilterError::NotFound("ip_blacklist".to_string());
        assert_eq!(err.to_string(), "filter not found: ip_blacklist");

        let err = FilterError::InvalidParameter("p must be in (0, 1)".to_string());
        assert_eq!(err.to_string(), "invalid parameter: p must be in (0, 1)");

        let err = FilterError::Timeout;
        assert_eq!(err.to_string(), "operation timed out");
    }

    #[test]
    fn test_retryable() {
        assert!(FilterError::BackendUnavailable("refused".into()).is_retryable());
        assert!(FilterError::Timeout.is_retryable());
        assert!(!FilterError::NotFound("x".into()).is_retryable());
        assert!(!FilterError::AlreadyExists("x".into()).is_retryable());
    }

    #[test]
    fn test_error_clone() {
        let err = FilterError::AlreadyExists("users".to_string());
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
