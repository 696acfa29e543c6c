//! Ports implemented by the persistence layer

mod repositories;
mod store;

pub use repositories::{
    AccountRepository, AuditRepository, GroupRepository, MembershipRepository, RepoResult,
};
pub use store::{RegistryStore, RegistryTransaction};
