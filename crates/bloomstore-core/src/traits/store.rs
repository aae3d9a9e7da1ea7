//! Filter store trait

use async_trait::async_trait;
use crate::error::Result;

/// Name-addressed byte store for persisted filter records.
///
/// This is the external collaborator boundary: implementations include
/// the in-memory store and Redis. Values are opaque encoded records;
/// the engine applies its [`RecordCodec`](crate::RecordCodec) before
/// and after store calls.
///
/// Failures must surface as `BackendUnavailable` rather than being
/// swallowed; callers decide whether to retry.
#[async_trait]
pub trait FilterStore: Send + Sync + 'static {
    /// Load the encoded record for `name`, or `None` if absent.
    async fn load(&self, name: &str) -> Result<Option<Vec<u8>>>;

    /// Save the encoded record for `name`, overwriting any prior value.
    async fn save(&self, name: &str, record: Vec<u8>) -> Result<()>;

    /// Delete the record for `name`.
    ///
    /// Returns `true` if a record existed and was deleted.
    async fn delete(&self, name: &str) -> Result<bool>;

    /// Whether a record exists for `name`.
    async fn exists(&self, name: &str) -> Result<bool>;

    /// Names of all stored records.
    async fn list(&self) -> Result<Vec<String>>;
}
