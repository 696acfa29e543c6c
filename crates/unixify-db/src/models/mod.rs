//! Database models - SQLx-compatible structs for PostgreSQL tables

mod account;
mod audit_entry;
mod group;
mod membership;

pub use account::AccountModel;
pub use audit_entry::AuditEntryModel;
pub use group::GroupModel;
pub use membership::MembershipModel;
