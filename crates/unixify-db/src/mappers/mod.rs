//! Entity to model mappers
//!
//! Rows carry identity types and audit enums as text, so conversions into
//! domain entities are fallible (`TryFrom<Model> for Entity`).

mod account;
mod audit_entry;
mod group;
mod membership;

pub use account::accounts_from_models;
pub use group::groups_from_models;
