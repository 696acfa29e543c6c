//! Transactional write port
//!
//! A mutation and its audit entry are written through one
//! [`RegistryTransaction`]. Dropping a transaction without calling
//! [`commit`](RegistryTransaction::commit) discards every write made on it.

use async_trait::async_trait;

use super::RepoResult;
use crate::entities::{Account, AccountDraft, AuditEntry, Group, GroupDraft, Membership, NewAuditEntry};

#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// Open a new write transaction
    async fn begin(&self) -> RepoResult<Box<dyn RegistryTransaction>>;

    /// Check the store is reachable
    async fn ping(&self) -> RepoResult<()>;
}

#[async_trait]
pub trait RegistryTransaction: Send {
    /// Insert an account, returning it with its assigned ID
    async fn insert_account(&mut self, draft: &AccountDraft) -> RepoResult<Account>;

    /// Overwrite a non-deleted account
    async fn update_account(&mut self, id: i64, draft: &AccountDraft) -> RepoResult<Account>;

    /// Mark an account deleted
    async fn soft_delete_account(&mut self, id: i64) -> RepoResult<()>;

    /// Insert a group, returning it with its assigned ID
    async fn insert_group(&mut self, draft: &GroupDraft) -> RepoResult<Group>;

    /// Overwrite a non-deleted group
    async fn update_group(&mut self, id: i64, draft: &GroupDraft) -> RepoResult<Group>;

    /// Mark a group deleted
    async fn soft_delete_group(&mut self, id: i64) -> RepoResult<()>;

    /// Add a membership row; an existing pair is a conflict
    async fn insert_membership(&mut self, account_id: i64, group_id: i64)
        -> RepoResult<Membership>;

    /// Remove a membership row, returning whether one existed
    async fn delete_membership(&mut self, account_id: i64, group_id: i64) -> RepoResult<bool>;

    /// Append an audit entry
    async fn append_audit(&mut self, entry: &NewAuditEntry) -> RepoResult<AuditEntry>;

    /// Make every write on this transaction durable
    async fn commit(self: Box<Self>) -> RepoResult<()>;
}
