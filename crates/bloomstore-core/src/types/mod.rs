//! Core types for filter operations

mod params;
mod record;
mod stats;

pub use params::FilterParams;
pub use record::FilterRecord;
pub use stats::FilterStats;
