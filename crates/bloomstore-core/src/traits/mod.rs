//! Core traits for filter operations

mod codec;
mod element;
mod metrics;
mod store;

pub use codec::RecordCodec;
pub use element::FilterElement;
pub use metrics::{FilterMetrics, FilterOperation, NoopMetrics};
pub use store::FilterStore;

#[cfg(feature = "json")]
pub use codec::JsonCodec;

#[cfg(feature = "json")]
pub use element::JsonElement;

#[cfg(feature = "bincode")]
pub use codec::BincodeCodec;

#[cfg(feature = "metrics")]
pub use metrics::MetricsCrateAdapter;

#[cfg(feature = "tracing")]
mod tracing;

#[cfg(feature = "tracing")]
pub use tracing::TracingMetrics;
