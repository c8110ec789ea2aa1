//! Metrics sink boundary.
//!
//! All instrumentation flows through MetricsEvent and MetricsSink.
//! This module is the only bridge between lifecycle code and the global
//! metrics state.
use crate::{engine::EngineOp, obs::metrics};

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    BuilderOpened {
        entity: &'static str,
    },
    ConditionAdded {
        entity: &'static str,
        op: EngineOp,
    },
    BuilderClosed {
        entity: &'static str,
        released_on_drop: bool,
    },
    QueryCompiled {
        entity: &'static str,
    },
    QueryClosed {
        entity: &'static str,
        released_on_drop: bool,
    },
    EngineRejected {
        entity: &'static str,
        op: EngineOp,
    },
    UseAfterClose {
        entity: &'static str,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink: Send + Sync {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default process-wide sink that writes into global metrics state.
/// Acts as the concrete sink when no store-level override is installed.

pub struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        metrics::with_state_mut(|m| match event {
            MetricsEvent::BuilderOpened { entity } => {
                m.ops.builders_opened = m.ops.builders_opened.saturating_add(1);
                let entry = m.entities.entry(entity).or_default();
                entry.builders_opened = entry.builders_opened.saturating_add(1);
            }

            MetricsEvent::ConditionAdded { entity, op } => {
                m.ops.conditions_added = m.ops.conditions_added.saturating_add(1);
                let count = m.conditions.entry(op.as_str()).or_default();
                *count = count.saturating_add(1);
                let entry = m.entities.entry(entity).or_default();
                entry.conditions_added = entry.conditions_added.saturating_add(1);
            }

            MetricsEvent::BuilderClosed {
                released_on_drop, ..
            } => {
                m.ops.builders_closed = m.ops.builders_closed.saturating_add(1);
                if released_on_drop {
                    m.ops.builders_released_on_drop =
                        m.ops.builders_released_on_drop.saturating_add(1);
                }
            }

            MetricsEvent::QueryCompiled { entity } => {
                m.ops.queries_compiled = m.ops.queries_compiled.saturating_add(1);
                let entry = m.entities.entry(entity).or_default();
                entry.queries_compiled = entry.queries_compiled.saturating_add(1);
            }

            MetricsEvent::QueryClosed {
                released_on_drop, ..
            } => {
                m.ops.queries_closed = m.ops.queries_closed.saturating_add(1);
                if released_on_drop {
                    m.ops.queries_released_on_drop =
                        m.ops.queries_released_on_drop.saturating_add(1);
                }
            }

            MetricsEvent::EngineRejected { entity, .. } => {
                m.ops.engine_rejections = m.ops.engine_rejections.saturating_add(1);
                let entry = m.entities.entry(entity).or_default();
                entry.engine_rejections = entry.engine_rejections.saturating_add(1);
            }

            MetricsEvent::UseAfterClose { .. } => {
                m.ops.use_after_close = m.ops.use_after_close.saturating_add(1);
            }
        });
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

/// Snapshot the current global metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all global metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}
