//! Core runtime for boxql: the entity/property model, the engine binding
//! contract, typed condition builders, and the compiled-query lifecycle.
#![warn(unreachable_pub)]

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod model;
pub mod obs;
pub mod traits;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, engines, or metrics helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        db::{EntityBox, Query, QueryBuilder, Store},
        model::{EntityModel, PropertyId, PropertyModel, ValueType},
        traits::EntityKind,
    };
}
