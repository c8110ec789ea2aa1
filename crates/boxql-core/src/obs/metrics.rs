use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;

///
/// EventState
/// Ephemeral, process-wide counters for builder and query lifecycles.
///

#[derive(Clone, Debug, Default)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) conditions: BTreeMap<&'static str, u64>,
    pub(crate) entities: BTreeMap<&'static str, EntityCounters>,
}

impl EventState {
    const fn new() -> Self {
        Self {
            ops: EventOps::new(),
            conditions: BTreeMap::new(),
            entities: BTreeMap::new(),
        }
    }
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Builder lifecycle
    pub builders_opened: u64,
    pub builders_closed: u64,
    pub builders_released_on_drop: u64,
    pub conditions_added: u64,

    // Compiled queries
    pub queries_compiled: u64,
    pub queries_closed: u64,
    pub queries_released_on_drop: u64,

    // Failures
    pub engine_rejections: u64,
    pub use_after_close: u64,
}

impl EventOps {
    const fn new() -> Self {
        Self {
            builders_opened: 0,
            builders_closed: 0,
            builders_released_on_drop: 0,
            conditions_added: 0,
            queries_compiled: 0,
            queries_closed: 0,
            queries_released_on_drop: 0,
            engine_rejections: 0,
            use_after_close: 0,
        }
    }
}

///
/// EntityCounters
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EntityCounters {
    pub builders_opened: u64,
    pub conditions_added: u64,
    pub queries_compiled: u64,
    pub engine_rejections: u64,
}

///
/// EventReport
/// Point-in-time snapshot of the global counters.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    /// Conditions forwarded, keyed by engine entry point.
    pub conditions: BTreeMap<String, u64>,
    pub entities: BTreeMap<String, EntityCounters>,
}

static STATE: Mutex<EventState> = parking_lot::const_mutex(EventState::new());

pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    f(&mut STATE.lock())
}

pub(crate) fn report() -> EventReport {
    let state = STATE.lock();

    EventReport {
        ops: state.ops.clone(),
        conditions: state
            .conditions
            .iter()
            .map(|(op, count)| ((*op).to_string(), *count))
            .collect(),
        entities: state
            .entities
            .iter()
            .map(|(entity, counters)| ((*entity).to_string(), counters.clone()))
            .collect(),
    }
}

pub(crate) fn reset_all() {
    *STATE.lock() = EventState::new();
}
