//! Condition accumulation and the builder-to-query transition.
mod builder;
mod compiled;
mod operand;


pub use builder::QueryBuilder;
pub use compiled::Query;
pub use operand::{EqualOperand, MembershipOperand, OrderOperand};
