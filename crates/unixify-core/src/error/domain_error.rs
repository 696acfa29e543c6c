//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{IdKind, IdentityType};

/// Coarse classification used by outer layers to pick a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Negative id, unknown type, malformed input
    StructuralInvalid,
    /// uid/gid/username/groupname collision
    DuplicateConflict,
    /// Missing or incompatible reference between entities
    Referential,
    /// The addressed record does not exist
    NotFound,
    /// Storage unavailable or unexpected storage failure
    Persistence,
    /// Mutation could not be recorded in the audit log
    AuditWrite,
}

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Account not found: {0}")]
    AccountNotFound(i64),

    #[error("Group not found: {0}")]
    GroupNotFound(i64),

    #[error("No account with {field} {value}")]
    AccountNotFoundBy { field: &'static str, value: String },

    #[error("No group with {field} {value}")]
    GroupNotFoundBy { field: &'static str, value: String },

    #[error("Account {account_id} is not a member of group {group_id}")]
    MembershipNotFound { account_id: i64, group_id: i64 },

    #[error("Audit entry not found: {0}")]
    AuditEntryNotFound(i64),

    // =========================================================================
    // Structural Validation Errors
    // =========================================================================
    #[error("{0} cannot be negative")]
    NegativeIdentifier(IdKind),

    #[error("invalid type: {0}")]
    InvalidType(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("account with UID {0} already exists")]
    UidTaken(i64),

    #[error("group with GID {0} already exists")]
    GidTaken(i64),

    #[error("account with username {0} already exists")]
    UsernameTaken(String),

    #[error("group with groupname {0} already exists")]
    GroupnameTaken(String),

    #[error("account {account_id} is already a member of group {group_id}")]
    AlreadyMember { account_id: i64, group_id: i64 },

    #[error("group {group_id} is the primary group of {accounts} account(s)")]
    GroupInUse { group_id: i64, accounts: i64 },

    // =========================================================================
    // Referential Errors
    // =========================================================================
    #[error("system accounts must have a primary group")]
    PrimaryGroupRequired,

    #[error("system accounts must have a system group as primary group (group {group_id} is {group_type})")]
    PrimaryGroupNotSystem {
        group_id: i64,
        group_type: IdentityType,
    },

    #[error("{entity} with ID {id} not found")]
    MissingReference { entity: &'static str, id: i64 },

    #[error("account of type {account_type} cannot be assigned to group of type {group_type}")]
    IncompatibleTypes {
        account_type: IdentityType,
        group_type: IdentityType,
    },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Audit write failed: {0}")]
    AuditWriteFailed(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get the error category
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AccountNotFound(_)
            | Self::GroupNotFound(_)
            | Self::AccountNotFoundBy { .. }
            | Self::GroupNotFoundBy { .. }
            | Self::MembershipNotFound { .. }
            | Self::AuditEntryNotFound(_) => ErrorKind::NotFound,

            Self::NegativeIdentifier(_) | Self::InvalidType(_) | Self::ValidationError(_) => {
                ErrorKind::StructuralInvalid
            }

            Self::UidTaken(_)
            | Self::GidTaken(_)
            | Self::UsernameTaken(_)
            | Self::GroupnameTaken(_)
            | Self::AlreadyMember { .. }
            | Self::GroupInUse { .. } => ErrorKind::DuplicateConflict,

            Self::PrimaryGroupRequired
            | Self::PrimaryGroupNotSystem { .. }
            | Self::MissingReference { .. }
            | Self::IncompatibleTypes { .. } => ErrorKind::Referential,

            Self::DatabaseError(_) | Self::InternalError(_) => ErrorKind::Persistence,

            Self::AuditWriteFailed(_) => ErrorKind::AuditWrite,
        }
    }

    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::AccountNotFound(_) | Self::AccountNotFoundBy { .. } => "UNKNOWN_ACCOUNT",
            Self::GroupNotFound(_) | Self::GroupNotFoundBy { .. } => "UNKNOWN_GROUP",
            Self::MembershipNotFound { .. } => "UNKNOWN_MEMBERSHIP",
            Self::AuditEntryNotFound(_) => "UNKNOWN_AUDIT_ENTRY",

            // Validation
            Self::NegativeIdentifier(_) => "NEGATIVE_IDENTIFIER",
            Self::InvalidType(_) => "INVALID_TYPE",
            Self::ValidationError(_) => "VALIDATION_ERROR",

            // Conflict
            Self::UidTaken(_) => "UID_TAKEN",
            Self::GidTaken(_) => "GID_TAKEN",
            Self::UsernameTaken(_) => "USERNAME_TAKEN",
            Self::GroupnameTaken(_) => "GROUPNAME_TAKEN",
            Self::AlreadyMember { .. } => "ALREADY_MEMBER",
            Self::GroupInUse { .. } => "GROUP_IN_USE",

            // Referential
            Self::PrimaryGroupRequired => "PRIMARY_GROUP_REQUIRED",
            Self::PrimaryGroupNotSystem { .. } => "PRIMARY_GROUP_NOT_SYSTEM",
            Self::MissingReference { .. } => "MISSING_REFERENCE",
            Self::IncompatibleTypes { .. } => "INCOMPATIBLE_TYPES",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::AuditWriteFailed(_) => "AUDIT_WRITE_FAILED",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Check if this is a structural validation error
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::StructuralInvalid
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::DuplicateConflict
    }

    /// Check if this is a referential error
    pub fn is_referential(&self) -> bool {
        self.kind() == ErrorKind::Referential
    }

    /// Check if the mutation committed state could not be audited
    pub fn is_audit_write(&self) -> bool {
        self.kind() == ErrorKind::AuditWrite
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::StructuralInvalid => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::DuplicateConflict => 409,
            ErrorKind::Referential => 422,
            ErrorKind::Persistence | ErrorKind::AuditWrite => 500,
        }
    }
}
