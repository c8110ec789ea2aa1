use serde::{Deserialize, Serialize};
use std::fmt;

///
/// PropertyId
///
/// Stable, small, non-negative identifier of a property within its entity.
/// This is the id forwarded to the engine for every condition.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PropertyId(u32);

impl PropertyId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

///
/// ValueType
///
/// Value class of a property. Conditions are type-specific; there is no
/// implicit conversion between the classes.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ValueType {
    Int64,
    Float64,
    Text,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Text => "text",
        };
        write!(f, "{label}")
    }
}

///
/// PropertyModel
/// Immutable metadata for one queryable property.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PropertyModel {
    pub id: PropertyId,
    pub name: &'static str,
    pub value_type: ValueType,
}

impl PropertyModel {
    #[must_use]
    pub const fn new(id: u32, name: &'static str, value_type: ValueType) -> Self {
        Self {
            id: PropertyId::new(id),
            name,
            value_type,
        }
    }

    #[must_use]
    pub const fn int64(id: u32, name: &'static str) -> Self {
        Self::new(id, name, ValueType::Int64)
    }

    #[must_use]
    pub const fn float64(id: u32, name: &'static str) -> Self {
        Self::new(id, name, ValueType::Float64)
    }

    #[must_use]
    pub const fn text(id: u32, name: &'static str) -> Self {
        Self::new(id, name, ValueType::Text)
    }
}
