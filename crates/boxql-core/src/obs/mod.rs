//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Builder and query lifecycle code never touches metrics state directly;
//! everything flows through `MetricsEvent` and a `MetricsSink`.

pub(crate) mod metrics;
pub(crate) mod sink;

#[cfg(test)]
mod tests;

// re-exports
pub use metrics::{EntityCounters, EventOps, EventReport};
pub use sink::{GlobalMetricsSink, MetricsEvent, MetricsSink, metrics_report, metrics_reset_all};
