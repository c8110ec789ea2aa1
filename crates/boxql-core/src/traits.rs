use crate::{error::InternalError, model::EntityModel};

///
/// EntityKind
///
/// Compile-time identity of a queryable entity plus access to its
/// runtime metadata.
///
/// ## Semantics
/// - `ENTITY_NAME` is the name the engine addresses the entity by
/// - `resolve_model` may be expensive or fail; callers go through
///   `EntityBox::properties`, which resolves once and caches
///

pub trait EntityKind: 'static {
    const ENTITY_NAME: &'static str;

    fn resolve_model() -> Result<EntityModel, InternalError>;
}
