//! Repository implementations
//!
//! PostgreSQL implementations of the repository and store traits defined in
//! unixify-core. Reads use the pool directly; writes run inside a
//! [`PgRegistryTransaction`].

mod account;
mod audit;
mod error;
mod group;
mod membership;
mod store;

pub use account::PgAccountRepository;
pub use audit::PgAuditRepository;
pub use error::UniqueKey;
pub use group::PgGroupRepository;
pub use membership::PgMembershipRepository;
pub use store::{PgRegistryStore, PgRegistryTransaction};
