use crate::{
    db::{EntityBox, Query, Store},
    engine::{ContextHandle, EngineBinding, EngineError, EngineOp},
    error::QueryError,
    model::{PropertyId, PropertyModel},
    obs::MetricsEvent,
    traits::EntityKind,
};
use std::fmt;
use tracing::{debug, trace, warn};

use super::operand::{EqualOperand, MembershipOperand, OrderOperand};

///
/// QueryBuilder
///
/// Accumulates conditions for one entity into an engine-side predicate
/// context. Every condition is forwarded immediately and in call order; all
/// conditions are conjoined by the engine.
///
/// ## Lifecycle
/// - `Open` while the context handle is held
/// - `Closed` after `close`, after `build` (success or failure), or on drop
/// - there is no way back to `Open`; closed builders fail with
///   `QueryError::UseAfterClose` before any engine call
///

pub struct QueryBuilder<E: EntityKind> {
    entity_box: EntityBox<E>,
    handle: Option<ContextHandle>,
}

impl<E: EntityKind> QueryBuilder<E> {
    pub(crate) fn new(entity_box: EntityBox<E>) -> Result<Self, QueryError> {
        // Property metadata must be resolved before the context exists.
        entity_box
            .properties()
            .map_err(QueryError::ModelUnresolved)?;

        let store = entity_box.store();
        let handle = store
            .engine()
            .create_context(store.session(), E::ENTITY_NAME)
            .map_err(|source| rejected::<E>(store, EngineOp::CreateContext, source))?;

        store.record(MetricsEvent::BuilderOpened {
            entity: E::ENTITY_NAME,
        });
        debug!(entity = E::ENTITY_NAME, context = %handle, "query builder opened");

        Ok(Self {
            entity_box,
            handle: Some(handle),
        })
    }

    #[must_use]
    pub const fn entity_box(&self) -> &EntityBox<E> {
        &self.entity_box
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    // ------------------------------ (Not)Null ------------------------------

    pub fn is_null(&mut self, property: &PropertyModel) -> Result<&mut Self, QueryError> {
        self.apply(EngineOp::IsNull, property, |engine, ctx, id| {
            engine.is_null(ctx, id)
        })
    }

    pub fn not_null(&mut self, property: &PropertyModel) -> Result<&mut Self, QueryError> {
        self.apply(EngineOp::NotNull, property, |engine, ctx, id| {
            engine.not_null(ctx, id)
        })
    }

    // ------------------------------ Comparisons ------------------------------

    /// Equality: integer or text operand.
    pub fn equal<V: EqualOperand>(
        &mut self,
        property: &PropertyModel,
        value: V,
    ) -> Result<&mut Self, QueryError> {
        self.apply(V::EQUAL, property, |engine, ctx, id| {
            value.forward_equal(engine, ctx, id)
        })
    }

    pub fn not_equal<V: EqualOperand>(
        &mut self,
        property: &PropertyModel,
        value: V,
    ) -> Result<&mut Self, QueryError> {
        self.apply(V::NOT_EQUAL, property, |engine, ctx, id| {
            value.forward_not_equal(engine, ctx, id)
        })
    }

    /// Strictly less: integer or floating point operand.
    pub fn less<V: OrderOperand>(
        &mut self,
        property: &PropertyModel,
        value: V,
    ) -> Result<&mut Self, QueryError> {
        self.apply(V::LESS, property, |engine, ctx, id| {
            value.forward_less(engine, ctx, id)
        })
    }

    pub fn greater<V: OrderOperand>(
        &mut self,
        property: &PropertyModel,
        value: V,
    ) -> Result<&mut Self, QueryError> {
        self.apply(V::GREATER, property, |engine, ctx, id| {
            value.forward_greater(engine, ctx, id)
        })
    }

    pub fn between(
        &mut self,
        property: &PropertyModel,
        low: i64,
        high: i64,
    ) -> Result<&mut Self, QueryError> {
        self.apply(EngineOp::BetweenInt, property, |engine, ctx, id| {
            engine.between_int(ctx, id, low, high)
        })
    }

    /// Set membership over 32-bit or 64-bit integers.
    ///
    /// The engine may reject some value sets (for example with an invalid key
    /// error); that surfaces as `QueryError::EngineRejected`.
    pub fn is_in<V: MembershipOperand>(
        &mut self,
        property: &PropertyModel,
        values: V,
    ) -> Result<&mut Self, QueryError> {
        self.apply(V::OP, property, |engine, ctx, id| {
            values.forward_in(engine, ctx, id)
        })
    }

    // ------------------------------ Text ------------------------------

    pub fn contains(
        &mut self,
        property: &PropertyModel,
        value: &str,
    ) -> Result<&mut Self, QueryError> {
        self.apply(EngineOp::ContainsText, property, |engine, ctx, id| {
            engine.contains_text(ctx, id, value)
        })
    }

    pub fn starts_with(
        &mut self,
        property: &PropertyModel,
        value: &str,
    ) -> Result<&mut Self, QueryError> {
        self.apply(EngineOp::StartsWithText, property, |engine, ctx, id| {
            engine.starts_with_text(ctx, id, value)
        })
    }

    pub fn ends_with(
        &mut self,
        property: &PropertyModel,
        value: &str,
    ) -> Result<&mut Self, QueryError> {
        self.apply(EngineOp::EndsWithText, property, |engine, ctx, id| {
            engine.ends_with_text(ctx, id, value)
        })
    }

    // ------------------------------ Lifecycle ------------------------------

    /// Release the predicate context. Calling it again is a no-op.
    pub fn close(&mut self) {
        self.release(false);
    }

    /// Compile the accumulated conditions into a query and close this builder.
    ///
    /// The builder is closed afterwards whether or not compilation succeeded.
    /// The returned query owns a handle separate from the builder's context.
    pub fn build(&mut self) -> Result<Query<E>, QueryError> {
        let context = self.open_handle()?;
        let compiled = self.entity_box.store().engine().compile(context);
        let query = compiled.map(|handle| Query::new(self.entity_box.clone(), handle));

        self.close();

        query.map_err(|source| rejected::<E>(self.entity_box.store(), EngineOp::Compile, source))
    }

    fn open_handle(&self) -> Result<ContextHandle, QueryError> {
        self.handle.ok_or_else(|| {
            self.entity_box.store().record(MetricsEvent::UseAfterClose {
                entity: E::ENTITY_NAME,
            });

            QueryError::UseAfterClose {
                entity: E::ENTITY_NAME,
            }
        })
    }

    fn apply(
        &mut self,
        op: EngineOp,
        property: &PropertyModel,
        forward: impl FnOnce(&dyn EngineBinding, ContextHandle, PropertyId) -> Result<(), EngineError>,
    ) -> Result<&mut Self, QueryError> {
        let context = self.open_handle()?;
        let store = self.entity_box.store();

        if store.debug() {
            debug!(
                entity = E::ENTITY_NAME,
                context = %context,
                op = %op,
                property = property.name,
                "condition"
            );
        } else {
            trace!(
                entity = E::ENTITY_NAME,
                context = %context,
                op = %op,
                property = property.name,
                "condition"
            );
        }

        forward(store.engine(), context, property.id)
            .map_err(|source| rejected::<E>(store, op, source))?;
        store.record(MetricsEvent::ConditionAdded {
            entity: E::ENTITY_NAME,
            op,
        });

        Ok(self)
    }

    fn release(&mut self, on_drop: bool) {
        let Some(context) = self.handle.take() else {
            return;
        };
        let store = self.entity_box.store();

        store.engine().destroy_context(context);
        store.record(MetricsEvent::BuilderClosed {
            entity: E::ENTITY_NAME,
            released_on_drop: on_drop,
        });

        if on_drop {
            debug!(entity = E::ENTITY_NAME, context = %context, "query builder released on drop");
        } else {
            debug!(entity = E::ENTITY_NAME, context = %context, "query builder closed");
        }
    }
}

impl<E: EntityKind> fmt::Debug for QueryBuilder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("entity", &E::ENTITY_NAME)
            .field("handle", &self.handle)
            .finish()
    }
}

impl<E: EntityKind> Drop for QueryBuilder<E> {
    fn drop(&mut self) {
        self.release(true);
    }
}

// Relay an engine failure unchanged, with attribution.
fn rejected<E: EntityKind>(store: &Store, op: EngineOp, source: EngineError) -> QueryError {
    warn!(entity = E::ENTITY_NAME, op = %op, error = %source, "engine rejected operation");
    store.record(MetricsEvent::EngineRejected {
        entity: E::ENTITY_NAME,
        op,
    });

    QueryError::EngineRejected {
        entity: E::ENTITY_NAME,
        op,
        source,
    }
}
