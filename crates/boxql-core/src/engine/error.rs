use crate::model::{PropertyId, ValueType};
use thiserror::Error as ThisError;

///
/// EngineError
///
/// Failure reported by the engine binding. The query layer relays it to the
/// caller without re-categorising it.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum EngineError {
    #[error("unknown entity: '{name}'")]
    UnknownEntity { name: String },

    #[error("unknown session: {handle:#x}")]
    UnknownSession { handle: u64 },

    #[error("unknown predicate context: {handle:#x}")]
    UnknownContext { handle: u64 },

    #[error("unknown property {property} on '{entity}'")]
    UnknownProperty {
        entity: String,
        property: PropertyId,
    },

    #[error("property {property} is {expected}, condition operand is {found}")]
    TypeMismatch {
        property: PropertyId,
        expected: ValueType,
        found: ValueType,
    },

    #[error("invalid key: {message}")]
    InvalidKey { message: String },

    #[error("{message}")]
    Rejected { message: String },
}
