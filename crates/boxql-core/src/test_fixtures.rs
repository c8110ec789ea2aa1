use crate::{
    db::Store,
    engine::MemoryEngine,
    error::InternalError,
    model::{EntityModel, PropertyModel},
    obs::{MetricsEvent, MetricsSink},
    traits::EntityKind,
};
use parking_lot::Mutex;
use std::sync::Arc;

///
/// Order
/// Fixture entity covering all three value classes.
///

pub(crate) struct Order;

pub(crate) const QUANTITY: PropertyModel = PropertyModel::int64(3, "quantity");
pub(crate) const TOTAL: PropertyModel = PropertyModel::int64(5, "total");
pub(crate) const NOTE: PropertyModel = PropertyModel::text(7, "note");
pub(crate) const STATUS: PropertyModel = PropertyModel::int64(9, "status");
pub(crate) const CUSTOMER: PropertyModel = PropertyModel::text(11, "customer");
pub(crate) const WEIGHT: PropertyModel = PropertyModel::float64(12, "weight");

impl EntityKind for Order {
    const ENTITY_NAME: &'static str = "Order";

    fn resolve_model() -> Result<EntityModel, InternalError> {
        EntityModel::new(
            Self::ENTITY_NAME,
            vec![QUANTITY, TOTAL, NOTE, STATUS, CUSTOMER, WEIGHT],
        )
    }
}

///
/// Unmapped
/// Fixture entity whose metadata never resolves.
///

pub(crate) struct Unmapped;

impl EntityKind for Unmapped {
    const ENTITY_NAME: &'static str = "Unmapped";

    fn resolve_model() -> Result<EntityModel, InternalError> {
        Err(InternalError::model_unresolved(
            Self::ENTITY_NAME,
            "no metadata registered",
        ))
    }
}

///
/// RecordingSink
///

#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<MetricsEvent>>,
}

impl RecordingSink {
    pub(crate) fn events(&self) -> Vec<MetricsEvent> {
        self.events.lock().clone()
    }
}

impl MetricsSink for RecordingSink {
    fn record(&self, event: MetricsEvent) {
        self.events.lock().push(event);
    }
}

/// Engine with `Order` registered, plus a store over one open session.
pub(crate) fn order_store() -> (Arc<MemoryEngine>, Store, Arc<RecordingSink>) {
    let engine = Arc::new(MemoryEngine::new());
    engine.register(Order::resolve_model().unwrap());
    let session = engine.open_session();
    let sink = Arc::new(RecordingSink::default());
    let store = Store::new(engine.clone(), session).metrics_sink(sink.clone());

    (engine, store, sink)
}
