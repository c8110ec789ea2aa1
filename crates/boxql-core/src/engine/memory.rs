//! In-process engine binding.
//!
//! Keeps predicate contexts and compiled queries in memory, validates
//! property ids and operand types against registered entity models, and
//! journals every call it receives. Used wherever a native engine is not
//! available, and by the test suites to observe exactly what the query
//! layer forwards.
use crate::{
    engine::{
        ContextHandle, EngineBinding, EngineError, EngineOp, QueryHandle, SessionHandle,
    },
    model::{EntityModel, PropertyId, ValueType},
};
use parking_lot::Mutex;
use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    num::NonZeroU64,
};

/// Journal entries kept before the oldest are discarded.
pub const DEFAULT_JOURNAL_CAPACITY: usize = 4096;
use tracing::trace;

///
/// Condition
///
/// Engine-side representation of one added condition.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    IsNull(PropertyId),
    NotNull(PropertyId),
    EqualInt(PropertyId, i64),
    NotEqualInt(PropertyId, i64),
    LessInt(PropertyId, i64),
    GreaterInt(PropertyId, i64),
    BetweenInt(PropertyId, i64, i64),
    InInt32(PropertyId, Vec<i32>),
    InInt64(PropertyId, Vec<i64>),
    EqualText(PropertyId, String),
    NotEqualText(PropertyId, String),
    ContainsText(PropertyId, String),
    StartsWithText(PropertyId, String),
    EndsWithText(PropertyId, String),
    LessFloat(PropertyId, f64),
    GreaterFloat(PropertyId, f64),
}

impl Condition {
    #[must_use]
    pub const fn op(&self) -> EngineOp {
        match self {
            Self::IsNull(_) => EngineOp::IsNull,
            Self::NotNull(_) => EngineOp::NotNull,
            Self::EqualInt(..) => EngineOp::EqualInt,
            Self::NotEqualInt(..) => EngineOp::NotEqualInt,
            Self::LessInt(..) => EngineOp::LessInt,
            Self::GreaterInt(..) => EngineOp::GreaterInt,
            Self::BetweenInt(..) => EngineOp::BetweenInt,
            Self::InInt32(..) => EngineOp::InInt32,
            Self::InInt64(..) => EngineOp::InInt64,
            Self::EqualText(..) => EngineOp::EqualText,
            Self::NotEqualText(..) => EngineOp::NotEqualText,
            Self::ContainsText(..) => EngineOp::ContainsText,
            Self::StartsWithText(..) => EngineOp::StartsWithText,
            Self::EndsWithText(..) => EngineOp::EndsWithText,
            Self::LessFloat(..) => EngineOp::LessFloat,
            Self::GreaterFloat(..) => EngineOp::GreaterFloat,
        }
    }

    #[must_use]
    pub const fn property(&self) -> PropertyId {
        match self {
            Self::IsNull(p)
            | Self::NotNull(p)
            | Self::EqualInt(p, _)
            | Self::NotEqualInt(p, _)
            | Self::LessInt(p, _)
            | Self::GreaterInt(p, _)
            | Self::BetweenInt(p, _, _)
            | Self::InInt32(p, _)
            | Self::InInt64(p, _)
            | Self::EqualText(p, _)
            | Self::NotEqualText(p, _)
            | Self::ContainsText(p, _)
            | Self::StartsWithText(p, _)
            | Self::EndsWithText(p, _)
            | Self::LessFloat(p, _)
            | Self::GreaterFloat(p, _) => *p,
        }
    }

    /// Value class of the operand; `None` for null tests.
    #[must_use]
    pub const fn operand_type(&self) -> Option<ValueType> {
        match self {
            Self::IsNull(_) | Self::NotNull(_) => None,
            Self::EqualInt(..)
            | Self::NotEqualInt(..)
            | Self::LessInt(..)
            | Self::GreaterInt(..)
            | Self::BetweenInt(..)
            | Self::InInt32(..)
            | Self::InInt64(..) => Some(ValueType::Int64),
            Self::EqualText(..)
            | Self::NotEqualText(..)
            | Self::ContainsText(..)
            | Self::StartsWithText(..)
            | Self::EndsWithText(..) => Some(ValueType::Text),
            Self::LessFloat(..) | Self::GreaterFloat(..) => Some(ValueType::Float64),
        }
    }
}

///
/// EngineCall
/// One journaled call, recorded on entry before the engine decides its outcome.
///

#[derive(Clone, Debug, PartialEq)]
pub enum EngineCall {
    CreateContext {
        session: SessionHandle,
        entity: String,
    },
    Condition {
        context: ContextHandle,
        condition: Condition,
    },
    Compile {
        context: ContextHandle,
    },
    DestroyContext {
        context: ContextHandle,
    },
    DestroyQuery {
        query: QueryHandle,
    },
}

impl EngineCall {
    #[must_use]
    pub const fn op(&self) -> EngineOp {
        match self {
            Self::CreateContext { .. } => EngineOp::CreateContext,
            Self::Condition { condition, .. } => condition.op(),
            Self::Compile { .. } => EngineOp::Compile,
            Self::DestroyContext { .. } => EngineOp::DestroyContext,
            Self::DestroyQuery { .. } => EngineOp::DestroyQuery,
        }
    }
}

struct ContextState {
    entity: &'static str,
    conditions: Vec<Condition>,
}

struct CompiledState {
    conditions: Vec<Condition>,
}

struct EngineState {
    next_handle: NonZeroU64,
    sessions: BTreeSet<u64>,
    entities: BTreeMap<&'static str, EntityModel>,
    contexts: BTreeMap<u64, ContextState>,
    queries: BTreeMap<u64, CompiledState>,
    journal: VecDeque<EngineCall>,
    journal_capacity: usize,
    faults: Vec<(EngineOp, EngineError)>,
    double_releases: u64,
}

impl EngineState {
    const fn new() -> Self {
        Self {
            next_handle: NonZeroU64::MIN,
            sessions: BTreeSet::new(),
            entities: BTreeMap::new(),
            contexts: BTreeMap::new(),
            queries: BTreeMap::new(),
            journal: VecDeque::new(),
            journal_capacity: DEFAULT_JOURNAL_CAPACITY,
            faults: Vec::new(),
            double_releases: 0,
        }
    }

    // Sessions, contexts and queries share one counter so no two handles alias.
    fn allocate(&mut self) -> NonZeroU64 {
        let handle = self.next_handle;
        self.next_handle = handle.saturating_add(1);

        handle
    }

    fn log(&mut self, call: EngineCall) {
        if self.journal_capacity == 0 {
            return;
        }
        while self.journal.len() >= self.journal_capacity {
            self.journal.pop_front();
        }
        self.journal.push_back(call);
    }

    fn take_fault(&mut self, op: EngineOp) -> Result<(), EngineError> {
        match self.faults.iter().position(|(fault_op, _)| *fault_op == op) {
            Some(index) => Err(self.faults.remove(index).1),
            None => Ok(()),
        }
    }

    fn validate(&self, context: ContextHandle, condition: &Condition) -> Result<(), EngineError> {
        let state = self
            .contexts
            .get(&context.get())
            .ok_or(EngineError::UnknownContext {
                handle: context.get(),
            })?;
        let model = self
            .entities
            .get(state.entity)
            .ok_or_else(|| EngineError::UnknownEntity {
                name: state.entity.to_string(),
            })?;
        let property = model.property_by_id(condition.property()).ok_or_else(|| {
            EngineError::UnknownProperty {
                entity: state.entity.to_string(),
                property: condition.property(),
            }
        })?;

        match condition.operand_type() {
            Some(found) if found != property.value_type => Err(EngineError::TypeMismatch {
                property: property.id,
                expected: property.value_type,
                found,
            }),
            _ => Ok(()),
        }
    }
}

///
/// MemoryEngine
///
/// The journal keeps the most recent `DEFAULT_JOURNAL_CAPACITY` calls unless
/// configured otherwise; a capacity of zero turns journaling off.
///

pub struct MemoryEngine {
    state: Mutex<EngineState>,
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEngine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: parking_lot::const_mutex(EngineState::new()),
        }
    }

    #[must_use]
    pub fn with_entity(self, model: EntityModel) -> Self {
        self.register(model);
        self
    }

    /// Keep at most `capacity` journal entries, discarding the oldest first.
    #[must_use]
    pub fn with_journal_capacity(self, capacity: usize) -> Self {
        {
            let mut state = self.state.lock();
            state.journal_capacity = capacity;
            while state.journal.len() > capacity {
                state.journal.pop_front();
            }
        }
        self
    }

    /// Register (or replace) the model an entity name resolves to.
    pub fn register(&self, model: EntityModel) {
        self.state.lock().entities.insert(model.entity_name, model);
    }

    #[must_use]
    pub fn open_session(&self) -> SessionHandle {
        let mut state = self.state.lock();
        let handle = state.allocate();
        state.sessions.insert(handle.get());

        SessionHandle::new(handle)
    }

    /// Make the next call of `op` fail with `error`.
    ///
    /// Destroy calls cannot fail, so queuing a fault for them is rejected.
    pub fn fail_next(&self, op: EngineOp, error: EngineError) -> Result<(), EngineError> {
        if !op.is_fallible() {
            return Err(EngineError::Rejected {
                message: format!("{op} cannot be made to fail"),
            });
        }
        self.state.lock().faults.push((op, error));

        Ok(())
    }

    #[must_use]
    pub fn journal(&self) -> Vec<EngineCall> {
        self.state.lock().journal.iter().cloned().collect()
    }

    pub fn clear_journal(&self) {
        self.state.lock().journal.clear();
    }

    #[must_use]
    pub fn live_contexts(&self) -> usize {
        self.state.lock().contexts.len()
    }

    #[must_use]
    pub fn live_queries(&self) -> usize {
        self.state.lock().queries.len()
    }

    /// Destroy calls that named an unknown or already released handle.
    #[must_use]
    pub fn double_releases(&self) -> u64 {
        self.state.lock().double_releases
    }

    #[must_use]
    pub fn context_conditions(&self, context: ContextHandle) -> Option<Vec<Condition>> {
        self.state
            .lock()
            .contexts
            .get(&context.get())
            .map(|state| state.conditions.clone())
    }

    #[must_use]
    pub fn compiled_conditions(&self, query: QueryHandle) -> Option<Vec<Condition>> {
        self.state
            .lock()
            .queries
            .get(&query.get())
            .map(|state| state.conditions.clone())
    }

    fn add(&self, context: ContextHandle, condition: Condition) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        state.log(EngineCall::Condition {
            context,
            condition: condition.clone(),
        });
        state.take_fault(condition.op())?;
        state.validate(context, &condition)?;

        trace!(context = %context, op = %condition.op(), "memory engine added condition");
        if let Some(ctx) = state.contexts.get_mut(&context.get()) {
            ctx.conditions.push(condition);
        }

        Ok(())
    }
}

impl EngineBinding for MemoryEngine {
    fn create_context(
        &self,
        session: SessionHandle,
        entity_name: &str,
    ) -> Result<ContextHandle, EngineError> {
        let mut state = self.state.lock();
        state.log(EngineCall::CreateContext {
            session,
            entity: entity_name.to_string(),
        });
        state.take_fault(EngineOp::CreateContext)?;

        if !state.sessions.contains(&session.get()) {
            return Err(EngineError::UnknownSession {
                handle: session.get(),
            });
        }
        let entity = state
            .entities
            .get_key_value(entity_name)
            .map(|(name, _)| *name)
            .ok_or_else(|| EngineError::UnknownEntity {
                name: entity_name.to_string(),
            })?;

        let handle = state.allocate();
        state.contexts.insert(
            handle.get(),
            ContextState {
                entity,
                conditions: Vec::new(),
            },
        );

        Ok(ContextHandle::new(handle))
    }

    fn destroy_context(&self, context: ContextHandle) {
        let mut state = self.state.lock();
        state.log(EngineCall::DestroyContext { context });

        if state.contexts.remove(&context.get()).is_none() {
            state.double_releases += 1;
        }
    }

    fn compile(&self, context: ContextHandle) -> Result<QueryHandle, EngineError> {
        let mut state = self.state.lock();
        state.log(EngineCall::Compile { context });
        state.take_fault(EngineOp::Compile)?;

        let conditions = state
            .contexts
            .get(&context.get())
            .map(|ctx| ctx.conditions.clone())
            .ok_or(EngineError::UnknownContext {
                handle: context.get(),
            })?;

        let handle = state.allocate();
        state
            .queries
            .insert(handle.get(), CompiledState { conditions });

        Ok(QueryHandle::new(handle))
    }

    fn destroy_query(&self, query: QueryHandle) {
        let mut state = self.state.lock();
        state.log(EngineCall::DestroyQuery { query });

        if state.queries.remove(&query.get()).is_none() {
            state.double_releases += 1;
        }
    }

    fn is_null(&self, context: ContextHandle, property: PropertyId) -> Result<(), EngineError> {
        self.add(context, Condition::IsNull(property))
    }

    fn not_null(&self, context: ContextHandle, property: PropertyId) -> Result<(), EngineError> {
        self.add(context, Condition::NotNull(property))
    }

    fn equal_int(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: i64,
    ) -> Result<(), EngineError> {
        self.add(context, Condition::EqualInt(property, value))
    }

    fn not_equal_int(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: i64,
    ) -> Result<(), EngineError> {
        self.add(context, Condition::NotEqualInt(property, value))
    }

    fn less_int(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: i64,
    ) -> Result<(), EngineError> {
        self.add(context, Condition::LessInt(property, value))
    }

    fn greater_int(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: i64,
    ) -> Result<(), EngineError> {
        self.add(context, Condition::GreaterInt(property, value))
    }

    fn between_int(
        &self,
        context: ContextHandle,
        property: PropertyId,
        low: i64,
        high: i64,
    ) -> Result<(), EngineError> {
        self.add(context, Condition::BetweenInt(property, low, high))
    }

    fn in_int32(
        &self,
        context: ContextHandle,
        property: PropertyId,
        values: &[i32],
    ) -> Result<(), EngineError> {
        self.add(context, Condition::InInt32(property, values.to_vec()))
    }

    fn in_int64(
        &self,
        context: ContextHandle,
        property: PropertyId,
        values: &[i64],
    ) -> Result<(), EngineError> {
        self.add(context, Condition::InInt64(property, values.to_vec()))
    }

    fn equal_text(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: &str,
    ) -> Result<(), EngineError> {
        self.add(context, Condition::EqualText(property, value.to_string()))
    }

    fn not_equal_text(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: &str,
    ) -> Result<(), EngineError> {
        self.add(context, Condition::NotEqualText(property, value.to_string()))
    }

    fn contains_text(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: &str,
    ) -> Result<(), EngineError> {
        self.add(context, Condition::ContainsText(property, value.to_string()))
    }

    fn starts_with_text(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: &str,
    ) -> Result<(), EngineError> {
        self.add(context, Condition::StartsWithText(property, value.to_string()))
    }

    fn ends_with_text(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: &str,
    ) -> Result<(), EngineError> {
        self.add(context, Condition::EndsWithText(property, value.to_string()))
    }

    fn less_float(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: f64,
    ) -> Result<(), EngineError> {
        self.add(context, Condition::LessFloat(property, value))
    }

    fn greater_float(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: f64,
    ) -> Result<(), EngineError> {
        self.add(context, Condition::GreaterFloat(property, value))
    }
}
