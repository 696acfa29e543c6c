//! # unixify-service
//!
//! Application layer containing the registry use cases, services, and DTOs.
//!
//! Every mutating operation runs the same pipeline: structural validation,
//! uniqueness and compatibility checks, cross-entity checks, then the write
//! and its audit entry inside one store transaction.

pub mod dto;
pub mod services;

#[cfg(any(test, feature = "test-util"))]
pub mod test_support;

pub use services::{
    AccountService, AuditService, GroupService, IdentifierService, MembershipService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};

pub use dto::{
    AccountResponse, Applied, AuditEntryResponse, CreateAccountRequest, CreateGroupRequest,
    DuplicateCheckResponse, GroupResponse, HealthResponse, MembershipRequest, NextIdResponse,
    ReadinessResponse, UpdateAccountRequest, UpdateGroupRequest, ValidationOutcomeResponse,
    WarningResponse,
};
