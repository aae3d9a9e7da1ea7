//! bloomstore-core: Core engine, traits and types for bloomstore
//!
//! This crate provides the probabilistic set-membership engine itself:
//! bit-array sizing, the deterministic hash family, the concurrent
//! [`Filter`], and the traits the rest of the bloomstore ecosystem
//! plugs into (stores, codecs, metrics).

mod bits;
mod error;
mod filter;
mod hash;
mod sizing;
mod traits;
mod types;

pub use bits::AtomicBitSet;
pub use error::{FilterError, Result};
pub use filter::Filter;
pub use hash::{HashFamily, Positions};
pub use sizing::{FilterShape, compute_size};
pub use traits::*;
pub use types::*;
