use async_trait::async_trait;
use bb8::{Pool, PooledConnection};
use bb8_redis::RedisConnectionManager;
use redis::AsyncCommands;
use std::future::Future;

use bloomstore_core::{FilterError, FilterStore, Result};

use super::config::RedisConfig;

/// Redis-backed filter store
///
/// Stores encoded filter records as raw byte values under prefixed
/// keys. Failed operations are retried with exponential backoff up to
/// the configured limit; persistent failures surface as
/// `BackendUnavailable`.
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool<RedisConnectionManager>,
    config: RedisConfig,
}

impl RedisStore {
    /// Create a new Redis store and connection pool
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let manager = RedisConnectionManager::new(config.url.as_str())
            .map_err(|e| FilterError::BackendUnavailable(e.to_string()))?;

        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|e| FilterError::BackendUnavailable(e.to_string()))?;

        Ok(Self { pool, config })
    }

    /// Get prefix for a record key
    fn prefixed_key(&self, name: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, name),
            None => name.to_string(),
        }
    }

    /// Get connection from pool
    async fn connection(&self) -> Result<PooledConnection<'_, RedisConnectionManager>> {
        self.pool
            .get()
            .await
            .map_err(|e| FilterError::BackendUnavailable(e.to_string()))
    }

    /// Run an operation with bounded exponential-backoff retries.
    async fn with_retry<T, Fut, F>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.config.retry_backoff * 2u32.saturating_pow(attempt - 1);
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.connection().await?;
        conn.get(key)
            .await
            .map_err(|e| FilterError::BackendUnavailable(e.to_string()))
    }

    async fn try_save(&self, key: &str, record: &[u8]) -> Result<()> {
        let mut conn = self.connection().await?;
        let _: () = conn
            .set(key, record)
            .await
            .map_err(|e| FilterError::BackendUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn try_delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        conn.del(key)
            .await
            .map_err(|e| FilterError::BackendUnavailable(e.to_string()))
    }

    async fn try_exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        conn.exists(key)
            .await
            .map_err(|e| FilterError::BackendUnavailable(e.to_string()))
    }

    async fn try_list(&self) -> Result<Vec<String>> {
        let mut conn = self.connection().await?;

        let match_pattern = match &self.config.key_prefix {
            Some(prefix) => format!("{}:*", prefix),
            None => "*".to_string(),
        };

        let mut names = Vec::new();
        let mut cursor = 0u64;
        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .cursor_arg(cursor)
                .arg("MATCH")
                .arg(&match_pattern)
                .arg("COUNT")
                .arg(1000)
                .query_async(&mut *conn)
                .await
                .map_err(|e| FilterError::BackendUnavailable(e.to_string()))?;

            for key in keys {
                names.push(strip_prefix(self.config.key_prefix.as_deref(), &key));
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }
        Ok(names)
    }
}

/// Undo [`RedisStore::prefixed_key`] on a key returned by SCAN.
fn strip_prefix(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => key
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix(':'))
            .unwrap_or(key)
            .to_string(),
        None => key.to_string(),
    }
}

#[async_trait]
impl FilterStore for RedisStore {
    async fn load(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let key = self.prefixed_key(name);
        self.with_retry(|| self.try_load(&key)).await
    }

    async fn save(&self, name: &str, record: Vec<u8>) -> Result<()> {
        let key = self.prefixed_key(name);
        self.with_retry(|| self.try_save(&key, &record)).await
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        let key = self.prefixed_key(name);
        self.with_retry(|| self.try_delete(&key)).await
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        let key = self.prefixed_key(name);
        self.with_retry(|| self.try_exists(&key)).await
    }

    async fn list(&self) -> Result<Vec<String>> {
        self.with_retry(|| self.try_list()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Connection-dependent behavior needs a live Redis; only the pure
    // key handling is covered here.

    #[test]
    fn test_strip_prefix() {
        assert_eq!(
            strip_prefix(Some("bloom"), "bloom:ip_blacklist"),
            "ip_blacklist"
        );
        assert_eq!(strip_prefix(None, "ip_blacklist"), "ip_blacklist");
        // Foreign keys that slip through the MATCH pattern are kept as-is.
        assert_eq!(strip_prefix(Some("bloom"), "other:key"), "other:key");
    }
}
