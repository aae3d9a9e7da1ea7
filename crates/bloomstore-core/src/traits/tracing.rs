use std::time::Duration;

use tracing::debug;

use crate::{FilterMetrics, FilterOperation};

/// Metrics adapter that logs filter events via `tracing`
#[derive(Debug, Clone, Default)]
pub struct TracingMetrics {
    /// Service name/prefix (optional)
    service_name: Option<String>,
}

impl TracingMetrics {
    /// Create new tracing metrics adapter
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with service name prefix
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }
}

impl FilterMetrics for TracingMetrics {
    fn record_create(&self, name: &str, bits: u64, hashes: u32) {
        debug!(
            target: "bloomstore",
            event = "create",
            filter = %name,
            bits = bits,
            hashes = hashes,
            service = ?self.service_name,
            "Filter Created"
        );
    }

    fn record_add(&self, name: &str) {
        tracing::trace!(
            target: "bloomstore",
            event = "add",
            filter = %name,
            service = ?self.service_name,
            "Element Added"
        );
    }

    fn record_query(&self, name: &str, positive: bool) {
        tracing::trace!(
            target: "bloomstore",
            event = "query",
            filter = %name,
            positive = positive,
            service = ?self.service_name,
            "Membership Query"
        );
    }

    fn record_drop(&self, name: &str, operation: FilterOperation) {
        debug!(
            target: "bloomstore",
            event = "drop",
            filter = %name,
            operation = operation.as_str(),
            service = ?self.service_name,
            "Filter Dropped"
        );
    }

    fn record_latency(&self, operation: FilterOperation, duration: Duration) {
        tracing::trace!(
            target: "bloomstore",
            event = "latency",
            operation = operation.as_str(),
            duration_us = duration.as_micros() as u64,
            service = ?self.service_name,
            "Filter Operation Latency"
        );
    }
}
