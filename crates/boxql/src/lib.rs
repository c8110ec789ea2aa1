//! boxql: typed condition builders and compiled-query lifecycle over an
//! embedded object store engine.
//!
//! ```ignore
//! use boxql::prelude::*;
//!
//! let orders = store.entity_box::<Order>();
//! let status = orders.property("status")?.clone();
//! let total = orders.property("total")?.clone();
//!
//! let mut builder = orders.query_builder()?;
//! builder.equal(&status, 2_i64)?.between(&total, 10, 20)?;
//! let query = builder.build()?;
//! ```
pub mod logging;

// re-exports
pub use boxql_core::{config, db, engine, error, model, obs, traits};

///
/// Prelude
///
/// Domain vocabulary plus the error type every fallible call returns.
///

pub mod prelude {
    pub use boxql_core::{error::QueryError, prelude::*};
}
