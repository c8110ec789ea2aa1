//! Runtime data model definitions.
//!
//! Types in `model` describe the queryable shape of an entity: which
//! properties exist, their stable ids, and their value classes. They are
//! produced by the entity's metadata system and merely referenced by the
//! query layer.
pub mod entity;
pub mod property;

pub use entity::EntityModel;
pub use property::{PropertyId, PropertyModel, ValueType};
