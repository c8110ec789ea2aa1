//! Store access, typed entity accessors, and the query layer.
mod entity_box;
pub mod query;
mod store;

pub use entity_box::EntityBox;
pub use query::{EqualOperand, MembershipOperand, OrderOperand, Query, QueryBuilder};
pub use store::Store;
