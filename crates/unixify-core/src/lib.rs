//! # unixify-core
//!
//! Domain layer for the UNIX account/group registry: entities, identity
//! types, the identifier range policy, validator, allocator and membership
//! rule, plus the repository and transaction ports.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod policy;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Account, AccountDraft, AuditAction, AuditEntityType, AuditEntry, AuditQuery, Group,
    GroupDraft, Membership, NewAuditEntry,
};
pub use error::{DomainError, ErrorKind};
pub use policy::{
    is_compatible, IdAllocator, IdOutcome, IdRange, IdValidator, InvalidReason, RangePolicy,
    RangeTable, RangeWarning,
};
pub use traits::{
    AccountRepository, AuditRepository, GroupRepository, MembershipRepository, RegistryStore,
    RegistryTransaction, RepoResult,
};
pub use value_objects::{Actor, IdKind, IdentityType};
