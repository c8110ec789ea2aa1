use crate::{
    db::EntityBox, engine::QueryHandle, error::QueryError, obs::MetricsEvent,
    traits::EntityKind,
};
use std::fmt;
use tracing::debug;

///
/// Query
///
/// Compiled, reusable query produced by `QueryBuilder::build`.
/// Exclusively owns its engine handle, which is never shared with the
/// builder's predicate context. Execution belongs to the engine.
///

pub struct Query<E: EntityKind> {
    entity_box: EntityBox<E>,
    handle: Option<QueryHandle>,
}

impl<E: EntityKind> Query<E> {
    pub(crate) fn new(entity_box: EntityBox<E>, handle: QueryHandle) -> Self {
        entity_box.store().record(MetricsEvent::QueryCompiled {
            entity: E::ENTITY_NAME,
        });
        debug!(entity = E::ENTITY_NAME, query = %handle, "query compiled");

        Self {
            entity_box,
            handle: Some(handle),
        }
    }

    #[must_use]
    pub const fn entity_box(&self) -> &EntityBox<E> {
        &self.entity_box
    }

    pub fn handle(&self) -> Result<QueryHandle, QueryError> {
        self.handle.ok_or_else(|| {
            self.entity_box.store().record(MetricsEvent::UseAfterClose {
                entity: E::ENTITY_NAME,
            });

            QueryError::UseAfterClose {
                entity: E::ENTITY_NAME,
            }
        })
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    /// Release the compiled query. Calling it again is a no-op.
    pub fn close(&mut self) {
        self.release(false);
    }

    fn release(&mut self, on_drop: bool) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let store = self.entity_box.store();

        store.engine().destroy_query(handle);
        store.record(MetricsEvent::QueryClosed {
            entity: E::ENTITY_NAME,
            released_on_drop: on_drop,
        });
        debug!(entity = E::ENTITY_NAME, query = %handle, on_drop, "query closed");
    }
}

impl<E: EntityKind> fmt::Debug for Query<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("entity", &E::ENTITY_NAME)
            .field("handle", &self.handle)
            .finish()
    }
}

impl<E: EntityKind> Drop for Query<E> {
    fn drop(&mut self) {
        self.release(true);
    }
}
