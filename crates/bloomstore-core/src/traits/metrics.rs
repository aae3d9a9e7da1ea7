//! Metrics trait for filter observability

use std::time::Duration;

/// Filter operation for latency tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperation {
    Create,
    Add,
    Contains,
    Clear,
    Delete,
    Persist,
    Load,
}

impl FilterOperation {
    /// Get operation as string label
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperation::Create => "create",
            FilterOperation::Add => "add",
            FilterOperation::Contains => "contains",
            FilterOperation::Clear => "clear",
            FilterOperation::Delete => "delete",
            FilterOperation::Persist => "persist",
            FilterOperation::Load => "load",
        }
    }
}

/// Trait for filter metrics/observability
///
/// Implement this to integrate with your metrics system. The engine
/// reports every operation here; correctness never depends on it.
pub trait FilterMetrics: Send + Sync + 'static {
    /// Record a filter creation with its derived dimensions
    fn record_create(&self, name: &str, bits: u64, hashes: u32);

    /// Record an element insertion
    fn record_add(&self, name: &str);

    /// Record a membership query and its outcome
    fn record_query(&self, name: &str, positive: bool);

    /// Record a filter removal or reset
    fn record_drop(&self, name: &str, operation: FilterOperation);

    /// Record operation latency
    fn record_latency(&self, operation: FilterOperation, duration: Duration);
}

/// No-op metrics implementation (default)
///
/// Zero overhead when metrics are not needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl FilterMetrics for NoopMetrics {
    #[inline]
    fn record_create(&self, _name: &str, _bits: u64, _hashes: u32) {}

    #[inline]
    fn record_add(&self, _name: &str) {}

    #[inline]
    fn record_query(&self, _name: &str, _positive: bool) {}

    #[inline]
    fn record_drop(&self, _name: &str, _operation: FilterOperation) {}

    #[inline]
    fn record_latency(&self, _operation: FilterOperation, _duration: Duration) {}
}

/// Metrics adapter using the `metrics` crate
///
/// Integrates with Prometheus, StatsD, and other exporters via the
/// `metrics` ecosystem.
#[cfg(feature = "metrics")]
#[derive(Debug, Clone)]
pub struct MetricsCrateAdapter {
    prefix: String,
}

#[cfg(feature = "metrics")]
impl MetricsCrateAdapter {
    /// Create a new adapter with the given metric name prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn metric_name(&self, name: &str) -> String {
        format!("{}_{}", self.prefix, name)
    }
}

#[cfg(feature = "metrics")]
impl FilterMetrics for MetricsCrateAdapter {
    fn record_create(&self, _name: &str, bits: u64, hashes: u32) {
        metrics::counter!(self.metric_name("creates_total")).increment(1);
        metrics::gauge!(self.metric_name("filter_bits")).set(bits as f64);
        metrics::gauge!(self.metric_name("filter_hashes")).set(hashes as f64);
    }

    fn record_add(&self, _name: &str) {
        metrics::counter!(self.metric_name("adds_total")).increment(1);
    }

    fn record_query(&self, _name: &str, positive: bool) {
        let outcome = if positive { "positive" } else { "negative" };
        metrics::counter!(self.metric_name("queries_total"), "outcome" => outcome).increment(1);
    }

    fn record_drop(&self, _name: &str, operation: FilterOperation) {
        metrics::counter!(
            self.metric_name("drops_total"),
            "operation" => operation.as_str()
        )
        .increment(1);
    }

    fn record_latency(&self, operation: FilterOperation, duration: Duration) {
        metrics::histogram!(
            self.metric_name("operation_duration_seconds"),
            "operation" => operation.as_str()
        )
        .record(duration.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_as_str() {
        assert_eq!(FilterOperation::Create.as_str(), "create");
        assert_eq!(FilterOperation::Contains.as_str(), "contains");
        assert_eq!(FilterOperation::Persist.as_str(), "persist");
    }

    #[test]
    fn test_noop_metrics() {
        let metrics = NoopMetrics;
        // Just verify these don't panic
        metrics.record_create("f", 100, 3);
        metrics.record_add("f");
        metrics.record_query("f", true);
        metrics.record_latency(FilterOperation::Add, Duration::from_micros(5));
    }
}
