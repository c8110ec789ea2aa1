//! Engine binding boundary.
//!
//! The engine owns condition representation, compilation, and execution.
//! This module only fixes the call surface the query layer relies on: one
//! entry point per operation and value width, addressed by opaque handles.
mod error;
pub mod memory;

#[cfg(test)]
mod tests;

pub use error::EngineError;
pub use memory::{Condition, EngineCall, MemoryEngine};

use crate::model::PropertyId;
use std::{fmt, num::NonZeroU64};

///
/// Handles
///
/// Opaque engine-side resource identifiers. Zero is never a valid handle;
/// owners represent the released state as `None`.
///

macro_rules! engine_handle {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        pub struct $name(NonZeroU64);

        impl $name {
            #[must_use]
            pub const fn new(raw: NonZeroU64) -> Self {
                Self(raw)
            }

            /// Wrap a raw engine value; `None` when the engine returned zero.
            #[must_use]
            pub const fn from_raw(raw: u64) -> Option<Self> {
                match NonZeroU64::new(raw) {
                    Some(raw) => Some(Self(raw)),
                    None => None,
                }
            }

            #[must_use]
            pub const fn get(self) -> u64 {
                self.0.get()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:#x}", self.0.get())
            }
        }
    };
}

engine_handle!(SessionHandle);
engine_handle!(ContextHandle);
engine_handle!(QueryHandle);

///
/// EngineOp
///
/// Every engine entry point, used to attribute errors, log lines, and metrics.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum EngineOp {
    CreateContext,
    DestroyContext,
    Compile,
    DestroyQuery,
    IsNull,
    NotNull,
    EqualInt,
    NotEqualInt,
    LessInt,
    GreaterInt,
    BetweenInt,
    InInt32,
    InInt64,
    EqualText,
    NotEqualText,
    ContainsText,
    StartsWithText,
    EndsWithText,
    LessFloat,
    GreaterFloat,
}

impl EngineOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateContext => "create_context",
            Self::DestroyContext => "destroy_context",
            Self::Compile => "compile",
            Self::DestroyQuery => "destroy_query",
            Self::IsNull => "is_null",
            Self::NotNull => "not_null",
            Self::EqualInt => "equal_int",
            Self::NotEqualInt => "not_equal_int",
            Self::LessInt => "less_int",
            Self::GreaterInt => "greater_int",
            Self::BetweenInt => "between_int",
            Self::InInt32 => "in_int32",
            Self::InInt64 => "in_int64",
            Self::EqualText => "equal_text",
            Self::NotEqualText => "not_equal_text",
            Self::ContainsText => "contains_text",
            Self::StartsWithText => "starts_with_text",
            Self::EndsWithText => "ends_with_text",
            Self::LessFloat => "less_float",
            Self::GreaterFloat => "greater_float",
        }
    }

    /// True for entry points that add a condition to a predicate context.
    #[must_use]
    pub const fn is_condition(self) -> bool {
        !matches!(
            self,
            Self::CreateContext | Self::DestroyContext | Self::Compile | Self::DestroyQuery
        )
    }

    /// True for entry points that can report an engine error.
    #[must_use]
    pub const fn is_fallible(self) -> bool {
        self.is_condition() || matches!(self, Self::CreateContext | Self::Compile)
    }
}

impl fmt::Display for EngineOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// EngineBinding
///
/// Handle-based call surface of the embedded engine.
///
/// ## Contract
/// - every call is synchronous and returns after the engine applied it
/// - `destroy_context` and `destroy_query` are called at most once per handle
/// - `compile` leaves the context alive; it still needs `destroy_context`
/// - conditions on one context are conjoined in the order they arrive
///

pub trait EngineBinding: Send + Sync {
    fn create_context(
        &self,
        session: SessionHandle,
        entity_name: &str,
    ) -> Result<ContextHandle, EngineError>;

    fn destroy_context(&self, context: ContextHandle);

    fn compile(&self, context: ContextHandle) -> Result<QueryHandle, EngineError>;

    fn destroy_query(&self, query: QueryHandle);

    // ------------------------------ (Not)Null ------------------------------

    fn is_null(&self, context: ContextHandle, property: PropertyId) -> Result<(), EngineError>;

    fn not_null(&self, context: ContextHandle, property: PropertyId) -> Result<(), EngineError>;

    // ------------------------------ Integers ------------------------------

    fn equal_int(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: i64,
    ) -> Result<(), EngineError>;

    fn not_equal_int(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: i64,
    ) -> Result<(), EngineError>;

    fn less_int(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: i64,
    ) -> Result<(), EngineError>;

    fn greater_int(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: i64,
    ) -> Result<(), EngineError>;

    fn between_int(
        &self,
        context: ContextHandle,
        property: PropertyId,
        low: i64,
        high: i64,
    ) -> Result<(), EngineError>;

    fn in_int32(
        &self,
        context: ContextHandle,
        property: PropertyId,
        values: &[i32],
    ) -> Result<(), EngineError>;

    fn in_int64(
        &self,
        context: ContextHandle,
        property: PropertyId,
        values: &[i64],
    ) -> Result<(), EngineError>;

    // ------------------------------ Strings ------------------------------

    fn equal_text(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: &str,
    ) -> Result<(), EngineError>;

    fn not_equal_text(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: &str,
    ) -> Result<(), EngineError>;

    fn contains_text(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: &str,
    ) -> Result<(), EngineError>;

    fn starts_with_text(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: &str,
    ) -> Result<(), EngineError>;

    fn ends_with_text(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: &str,
    ) -> Result<(), EngineError>;

    // ------------------------------ Floats ------------------------------

    fn less_float(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: f64,
    ) -> Result<(), EngineError>;

    fn greater_float(
        &self,
        context: ContextHandle,
        property: PropertyId,
        value: f64,
    ) -> Result<(), EngineError>;
}
