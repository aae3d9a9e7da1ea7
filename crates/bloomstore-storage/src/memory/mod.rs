//! In-memory filter store

mod store;

pub use store::{MemoryStore, StoreCounters};
