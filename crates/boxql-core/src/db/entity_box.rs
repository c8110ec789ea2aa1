use crate::{
    db::{QueryBuilder, Store},
    error::{InternalError, QueryError},
    model::{EntityModel, PropertyModel},
    traits::EntityKind,
};
use std::{
    fmt,
    marker::PhantomData,
    sync::{Arc, OnceLock},
};
use tracing::debug;

///
/// EntityBox
///
/// Typed accessor for one entity within a store. Owns the lazily resolved
/// entity model; clones share the same resolution.
///

pub struct EntityBox<E: EntityKind> {
    store: Store,
    model: Arc<OnceLock<EntityModel>>,
    _marker: PhantomData<fn() -> E>,
}

impl<E: EntityKind> Clone for EntityBox<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            model: Arc::clone(&self.model),
            _marker: PhantomData,
        }
    }
}

impl<E: EntityKind> fmt::Debug for EntityBox<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityBox")
            .field("entity", &E::ENTITY_NAME)
            .field("resolved", &self.is_resolved())
            .finish_non_exhaustive()
    }
}

impl<E: EntityKind> EntityBox<E> {
    pub(crate) fn new(store: Store) -> Self {
        Self {
            store,
            model: Arc::new(OnceLock::new()),
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub const fn entity_name(&self) -> &'static str {
        E::ENTITY_NAME
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.model.get().is_some()
    }

    /// Resolve the entity model, caching it after the first success.
    pub fn properties(&self) -> Result<&EntityModel, InternalError> {
        if let Some(model) = self.model.get() {
            return Ok(model);
        }

        let model = E::resolve_model()?;
        if model.entity_name != E::ENTITY_NAME {
            return Err(InternalError::model_invariant(format!(
                "entity '{}' resolved a model named '{}'",
                E::ENTITY_NAME,
                model.entity_name
            )));
        }
        debug!(
            entity = E::ENTITY_NAME,
            properties = model.properties.len(),
            "entity model resolved"
        );

        Ok(self.model.get_or_init(|| model))
    }

    pub fn property(&self, name: &str) -> Result<&PropertyModel, QueryError> {
        self.properties()
            .map_err(QueryError::ModelUnresolved)?
            .property(name)
            .ok_or_else(|| QueryError::UnknownProperty {
                entity: self.entity_name(),
                property: name.to_string(),
            })
    }

    /// Open a new query builder over this entity.
    pub fn query_builder(&self) -> Result<QueryBuilder<E>, QueryError> {
        QueryBuilder::new(self.clone())
    }
}
