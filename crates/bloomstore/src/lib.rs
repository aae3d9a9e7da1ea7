//! bloomstore: Named bloom filter engine with pluggable persistence
//!
//! # Features
//!
//! - **Probabilistic membership**: no false negatives, tunable
//!   false-positive rate, optimal sizing from `(n, p)`
//! - **Named filter registry** with explicit create/delete lifecycle
//! - **Concurrent mutation**: lock-free adds, gated clear/delete
//! - **Pluggable persistence** (in-memory, Redis) and record codecs
//!   (JSON, bincode)
//! - **Metrics integration**
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use bloomstore::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let engine = FilterEngine::new(MemoryStore::new());
//!
//!     engine
//!         .create("ip_blacklist", FilterParams::new(10_000, 0.01))
//!         .await?;
//!
//!     engine.add("ip_blacklist", "10.0.0.1")?;
//!     assert!(engine.contains("ip_blacklist", "10.0.0.1")?);
//!
//!     Ok(())
//! }
//! ```

mod engine;

// Re-export core
pub use bloomstore_core::*;

// Re-export storage
#[cfg(feature = "memory")]
pub use bloomstore_storage::MemoryStore;

#[cfg(feature = "redis")]
pub use bloomstore_storage::{RedisConfig, RedisStore};

// Export engine
pub use engine::{EngineConfig, FilterEngine};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        EngineConfig, FilterEngine, FilterError, FilterParams, FilterStats, FilterStore, Result,
    };

    #[cfg(feature = "memory")]
    pub use crate::MemoryStore;

    #[cfg(feature = "redis")]
    pub use crate::{RedisConfig, RedisStore};

    #[cfg(feature = "json")]
    pub use crate::JsonCodec;

    #[cfg(feature = "bincode")]
    pub use crate::BincodeCodec;
}
