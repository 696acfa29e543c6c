//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! validation, consistency checks and the audited write of every mutation.

pub mod account;
pub mod audit;
pub mod context;
pub mod error;
pub mod group;
pub mod identifier;
pub mod membership;
mod pipeline;

// Re-export all services for convenience
pub use account::AccountService;
pub use audit::AuditService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use group::GroupService;
pub use identifier::IdentifierService;
pub use membership::MembershipService;
