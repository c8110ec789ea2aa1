use crate::{
    config::StoreConfig,
    db::EntityBox,
    engine::{EngineBinding, SessionHandle},
    obs::{
        MetricsEvent, MetricsSink,
        sink::GLOBAL_METRICS_SINK,
    },
    traits::EntityKind,
};
use std::sync::Arc;

///
/// Store
///
/// One open engine session plus the policy (debug, metrics) applied to
/// every builder and query created through it. Cheap to clone.
///

#[derive(Clone)]
pub struct Store {
    engine: Arc<dyn EngineBinding>,
    session: SessionHandle,
    config: StoreConfig,
    metrics: Option<Arc<dyn MetricsSink>>,
}

impl Store {
    #[must_use]
    pub fn new(engine: Arc<dyn EngineBinding>, session: SessionHandle) -> Self {
        Self {
            engine,
            session,
            config: StoreConfig::default(),
            metrics: None,
        }
    }

    #[must_use]
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Route metrics to `sink` instead of the global counters.
    #[must_use]
    pub fn metrics_sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.metrics = Some(sink);
        self
    }

    #[must_use]
    pub const fn session(&self) -> SessionHandle {
        self.session
    }

    #[must_use]
    pub const fn store_config(&self) -> &StoreConfig {
        &self.config
    }

    #[must_use]
    pub fn entity_box<E: EntityKind>(&self) -> EntityBox<E> {
        EntityBox::new(self.clone())
    }

    pub(crate) fn engine(&self) -> &dyn EngineBinding {
        self.engine.as_ref()
    }

    pub(crate) const fn debug(&self) -> bool {
        self.config.debug
    }

    pub(crate) fn record(&self, event: MetricsEvent) {
        if !self.config.metrics {
            return;
        }

        match &self.metrics {
            Some(sink) => sink.record(event),
            None => GLOBAL_METRICS_SINK.record(event),
        }
    }
}
