//! Repository traits (ports) - define the interface for data access
//!
//! Reads never return soft-deleted accounts or groups. Writes go through
//! [`RegistryTransaction`](super::RegistryTransaction) so that every mutation
//! lands together with its audit entry.

use async_trait::async_trait;

use crate::entities::{Account, AuditEntry, AuditQuery, Group};
use crate::error::DomainError;
use crate::value_objects::IdentityType;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Account Repository
// ============================================================================

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by ID
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Account>>;

    /// Find the live account holding a UID
    async fn find_by_uid(&self, uid: i64) -> RepoResult<Option<Account>>;

    /// Find account by username
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>>;

    /// List accounts, optionally restricted to one type (ordered by UID)
    async fn find_all(&self, account_type: Option<IdentityType>) -> RepoResult<Vec<Account>>;

    /// Search by username or UID substring
    async fn search(&self, query: &str) -> RepoResult<Vec<Account>>;

    /// Accounts holding a secondary membership in a group
    async fn find_by_group(&self, group_id: i64) -> RepoResult<Vec<Account>>;

    /// Check if a UID is taken, ignoring `exclude_id` when non-zero
    async fn uid_exists(&self, uid: i64, exclude_id: i64) -> RepoResult<bool>;

    /// Check if a username is taken, ignoring `exclude_id` when non-zero
    async fn username_exists(&self, username: &str, exclude_id: i64) -> RepoResult<bool>;

    /// Highest UID among accounts of a type
    async fn max_uid(&self, account_type: IdentityType) -> RepoResult<Option<i64>>;

    /// Number of accounts using a group as their primary group
    async fn count_with_primary_group(&self, group_id: i64) -> RepoResult<i64>;
}

// ============================================================================
// Group Repository
// ============================================================================

#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Find group by ID
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Group>>;

    /// Find the live group holding a GID
    async fn find_by_gid(&self, gid: i64) -> RepoResult<Option<Group>>;

    /// Find group by groupname
    async fn find_by_groupname(&self, groupname: &str) -> RepoResult<Option<Group>>;

    /// List groups, optionally restricted to one type (ordered by GID)
    async fn find_all(&self, group_type: Option<IdentityType>) -> RepoResult<Vec<Group>>;

    /// Search by groupname or GID substring
    async fn search(&self, query: &str) -> RepoResult<Vec<Group>>;

    /// Groups an account is a secondary member of
    async fn find_by_account(&self, account_id: i64) -> RepoResult<Vec<Group>>;

    /// Check if a GID is taken, ignoring `exclude_id` when non-zero
    async fn gid_exists(&self, gid: i64, exclude_id: i64) -> RepoResult<bool>;

    /// Check if a groupname is taken, ignoring `exclude_id` when non-zero
    async fn groupname_exists(&self, groupname: &str, exclude_id: i64) -> RepoResult<bool>;

    /// Highest GID among groups of a type
    async fn max_gid(&self, group_type: IdentityType) -> RepoResult<Option<i64>>;
}

// ============================================================================
// Membership Repository
// ============================================================================

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Check if the (account, group) pair exists
    async fn exists(&self, account_id: i64, group_id: i64) -> RepoResult<bool>;
}

// ============================================================================
// Audit Repository
// ============================================================================

#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Entries matching the query, newest first
    async fn find(&self, query: &AuditQuery) -> RepoResult<Vec<AuditEntry>>;

    /// Find entry by ID
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<AuditEntry>>;
}
