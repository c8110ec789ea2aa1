use crate::engine::{EngineError, EngineOp};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Not a stable API; intended for internal use and may change without notice.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct a model-origin not-found error (metadata could not be resolved).
    pub fn model_unresolved(entity: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::NotFound,
            ErrorOrigin::Model,
            format!("entity model unresolved for '{entity}': {}", message.into()),
        )
    }

    /// Construct a model-origin invariant violation.
    pub(crate) fn model_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Model,
            message.into(),
        )
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// QueryError
///
/// Caller-facing failure of a query-builder or compiled-query operation.
/// Engine failures travel unchanged inside `EngineRejected`.
///

#[derive(Debug, ThisError)]
pub enum QueryError {
    #[error("handle for '{entity}' has already been closed; use a new instance")]
    UseAfterClose { entity: &'static str },

    #[error("engine rejected {op} for '{entity}': {source}")]
    EngineRejected {
        entity: &'static str,
        op: EngineOp,
        #[source]
        source: EngineError,
    },

    #[error(transparent)]
    ModelUnresolved(InternalError),

    #[error("entity '{entity}' has no property '{property}'")]
    UnknownProperty {
        entity: &'static str,
        property: String,
    },
}

impl QueryError {
    #[must_use]
    pub const fn is_use_after_close(&self) -> bool {
        matches!(self, Self::UseAfterClose { .. })
    }

    /// Engine error carried by this failure, if the engine reported it.
    #[must_use]
    pub const fn engine_error(&self) -> Option<&EngineError> {
        match self {
            Self::EngineRejected { source, .. } => Some(source),
            _ => None,
        }
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::UseAfterClose { .. } => ErrorClass::InvariantViolation,
            Self::EngineRejected { .. } => ErrorClass::Unsupported,
            Self::ModelUnresolved(err) => err.class,
            Self::UnknownProperty { .. } => ErrorClass::NotFound,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::UseAfterClose { .. } => ErrorOrigin::Query,
            Self::EngineRejected { .. } => ErrorOrigin::Engine,
            Self::ModelUnresolved(err) => err.origin,
            Self::UnknownProperty { .. } => ErrorOrigin::Model,
        }
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    NotFound,
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not_found",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Config,
    Model,
    Engine,
    Query,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "config",
            Self::Model => "model",
            Self::Engine => "engine",
            Self::Query => "query",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn use_after_close_is_an_invariant_violation() {
        let err = QueryError::UseAfterClose { entity: "Note" };

        assert!(err.is_use_after_close());
        assert_eq!(err.class(), ErrorClass::InvariantViolation);
        assert_eq!(err.origin(), ErrorOrigin::Query);
        assert!(err.engine_error().is_none());
    }

    #[test]
    fn engine_rejection_keeps_engine_error() {
        let err = QueryError::EngineRejected {
            entity: "Note",
            op: EngineOp::InInt64,
            source: EngineError::InvalidKey {
                message: "bad key".to_string(),
            },
        };

        assert_eq!(err.origin(), ErrorOrigin::Engine);
        assert!(matches!(
            err.engine_error(),
            Some(EngineError::InvalidKey { .. })
        ));
        assert_eq!(
            err.to_string(),
            "engine rejected in_int64 for 'Note': invalid key: bad key"
        );
    }

    #[test]
    fn unknown_property_is_not_found_in_model() {
        let err = QueryError::UnknownProperty {
            entity: "Note",
            property: "author".to_string(),
        };

        assert_eq!(err.class(), ErrorClass::NotFound);
        assert_eq!(err.origin(), ErrorOrigin::Model);
        assert_eq!(err.to_string(), "entity 'Note' has no property 'author'");
    }

    #[test]
    fn display_with_class_prefixes_origin_and_class() {
        let err = InternalError::model_unresolved("Note", "not registered");

        assert_eq!(
            err.display_with_class(),
            "model:not_found: entity model unresolved for 'Note': not registered"
        );
    }
}
