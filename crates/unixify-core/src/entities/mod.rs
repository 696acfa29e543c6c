//! Domain entities - core business objects

mod account;
mod audit;
mod group;
mod membership;

pub use account::{Account, AccountDraft};
pub use audit::{AuditAction, AuditEntityType, AuditEntry, AuditQuery, NewAuditEntry};
pub use group::{Group, GroupDraft};
pub use membership::Membership;
