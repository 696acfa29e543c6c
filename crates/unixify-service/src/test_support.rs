//! In-memory registry for service and router tests
//!
//! Compiled for this crate's tests and behind the `test-util` feature.
//!
//! Implements every repository port plus [`RegistryStore`]. A transaction
//! reads and writes a private copy of the state and logs each write. Commit
//! replays the log against the live state under the same checks, so a
//! transaction that lost a race to a concurrent commit fails with the
//! conflict PostgreSQL would raise, and a dropped transaction leaves nothing
//! behind. Unique and foreign-key constraints of the schema are mirrored.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use unixify_core::entities::{
    Account, AccountDraft, AuditEntry, AuditQuery, Group, GroupDraft, Membership, NewAuditEntry,
};
use unixify_core::error::DomainError;
use unixify_core::traits::{
    AccountRepository, AuditRepository, GroupRepository, MembershipRepository, RegistryStore,
    RegistryTransaction, RepoResult,
};
use unixify_core::value_objects::{Actor, IdentityType};
use unixify_core::RangePolicy;

use crate::services::ServiceContext;

#[derive(Debug, Clone, Default)]
struct State {
    accounts: Vec<Account>,
    groups: Vec<Group>,
    memberships: Vec<Membership>,
    audit: Vec<AuditEntry>,
}

/// One logged transaction write
#[derive(Debug, Clone)]
enum Write {
    InsertAccount(Account),
    UpdateAccount(Account),
    DeleteAccount(i64),
    InsertGroup(Group),
    UpdateGroup(Group),
    DeleteGroup(i64),
    InsertMembership(Membership),
    DeleteMembership { account_id: i64, group_id: i64 },
    Audit(AuditEntry),
}

impl State {
    fn live_accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter().filter(|a| !a.is_deleted())
    }

    fn live_groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter().filter(|g| !g.is_deleted())
    }

    fn live_account_mut(&mut self, id: i64) -> RepoResult<&mut Account> {
        self.accounts
            .iter_mut()
            .find(|a| a.id == id && !a.is_deleted())
            .ok_or(DomainError::AccountNotFound(id))
    }

    fn live_group_mut(&mut self, id: i64) -> RepoResult<&mut Group> {
        self.groups
            .iter_mut()
            .find(|g| g.id == id && !g.is_deleted())
            .ok_or(DomainError::GroupNotFound(id))
    }

    fn check_account(&self, account: &Account) -> RepoResult<()> {
        let others = || self.live_accounts().filter(|a| a.id != account.id);
        if others().any(|a| a.unix_uid == account.unix_uid) {
            return Err(DomainError::UidTaken(account.unix_uid));
        }
        if others().any(|a| a.username == account.username) {
            return Err(DomainError::UsernameTaken(account.username.clone()));
        }
        if let Some(group_id) = account.primary_group_id {
            if !self.groups.iter().any(|g| g.id == group_id) {
                return Err(DomainError::MissingReference {
                    entity: "group",
                    id: group_id,
                });
            }
        }
        Ok(())
    }

    fn check_group(&self, group: &Group) -> RepoResult<()> {
        let others = || self.live_groups().filter(|g| g.id != group.id);
        if others().any(|g| g.unix_gid == group.unix_gid) {
            return Err(DomainError::GidTaken(group.unix_gid));
        }
        if others().any(|g| g.groupname == group.groupname) {
            return Err(DomainError::GroupnameTaken(group.groupname.clone()));
        }
        Ok(())
    }

    fn check_membership(&self, membership: &Membership) -> RepoResult<()> {
        let (account_id, group_id) = (membership.account_id, membership.group_id);
        if !self.accounts.iter().any(|a| a.id == account_id) {
            return Err(DomainError::MissingReference {
                entity: "account",
                id: account_id,
            });
        }
        if !self.groups.iter().any(|g| g.id == group_id) {
            return Err(DomainError::MissingReference {
                entity: "group",
                id: group_id,
            });
        }
        if self
            .memberships
            .iter()
            .any(|m| m.account_id == account_id && m.group_id == group_id)
        {
            return Err(DomainError::AlreadyMember {
                account_id,
                group_id,
            });
        }
        Ok(())
    }

    /// Apply one write, enforcing the schema constraints against this state
    fn apply(&mut self, write: &Write) -> RepoResult<()> {
        match write {
            Write::InsertAccount(account) => {
                self.check_account(account)?;
                self.accounts.push(account.clone());
            }
            Write::UpdateAccount(account) => {
                self.check_account(account)?;
                *self.live_account_mut(account.id)? = account.clone();
            }
            Write::DeleteAccount(id) => {
                let account = self.live_account_mut(*id)?;
                account.deleted_at = Some(Utc::now());
                account.touch();
            }
            Write::InsertGroup(group) => {
                self.check_group(group)?;
                self.groups.push(group.clone());
            }
            Write::UpdateGroup(group) => {
                self.check_group(group)?;
                *self.live_group_mut(group.id)? = group.clone();
            }
            Write::DeleteGroup(id) => {
                let group = self.live_group_mut(*id)?;
                group.deleted_at = Some(Utc::now());
                group.updated_at = Utc::now();
            }
            Write::InsertMembership(membership) => {
                self.check_membership(membership)?;
                self.memberships.push(membership.clone());
            }
            Write::DeleteMembership {
                account_id,
                group_id,
            } => {
                self.memberships
                    .retain(|m| !(m.account_id == *account_id && m.group_id == *group_id));
            }
            Write::Audit(entry) => self.audit.push(entry.clone()),
        }
        Ok(())
    }
}

/// Shared in-memory registry; clone the `Arc` into every port
#[derive(Default)]
pub struct MemoryRegistry {
    state: Arc<Mutex<State>>,
    fail_audit: Arc<AtomicBool>,
    sequence: Arc<AtomicI64>,
}

impl MemoryRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every subsequent audit append fail
    pub fn fail_audit_writes(&self, fail: bool) {
        self.fail_audit.store(fail, Ordering::SeqCst);
    }

    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        self.state.lock().audit.clone()
    }

    pub fn live_account_count(&self) -> usize {
        self.state.lock().live_accounts().count()
    }

    pub fn live_group_count(&self) -> usize {
        self.state.lock().live_groups().count()
    }

    pub fn membership_count(&self) -> usize {
        self.state.lock().memberships.len()
    }

    /// Account row including soft-deleted ones
    pub fn raw_account(&self, id: i64) -> Option<Account> {
        self.state.lock().accounts.iter().find(|a| a.id == id).cloned()
    }
}

#[async_trait]
impl AccountRepository for MemoryRegistry {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Account>> {
        Ok(self.state.lock().live_accounts().find(|a| a.id == id).cloned())
    }

    async fn find_by_uid(&self, uid: i64) -> RepoResult<Option<Account>> {
        let state = self.state.lock();
        let result = state.live_accounts().find(|a| a.unix_uid == uid).cloned();
        Ok(result)
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>> {
        let state = self.state.lock();
        let result = state.live_accounts().find(|a| a.username == username).cloned();
        Ok(result)
    }

    async fn find_all(&self, account_type: Option<IdentityType>) -> RepoResult<Vec<Account>> {
        let state = self.state.lock();
        let mut accounts: Vec<Account> = state
            .live_accounts()
            .filter(|a| account_type.map_or(true, |t| a.account_type == t))
            .cloned()
            .collect();
        accounts.sort_by_key(|a| a.unix_uid);
        Ok(accounts)
    }

    async fn search(&self, query: &str) -> RepoResult<Vec<Account>> {
        let state = self.state.lock();
        let mut accounts: Vec<Account> = state
            .live_accounts()
            .filter(|a| a.username.contains(query) || a.unix_uid.to_string().contains(query))
            .cloned()
            .collect();
        accounts.sort_by_key(|a| a.unix_uid);
        Ok(accounts)
    }

    async fn find_by_group(&self, group_id: i64) -> RepoResult<Vec<Account>> {
        let state = self.state.lock();
        let mut accounts: Vec<Account> = state
            .live_accounts()
            .filter(|a| {
                state
                    .memberships
                    .iter()
                    .any(|m| m.group_id == group_id && m.account_id == a.id)
            })
            .cloned()
            .collect();
        accounts.sort_by_key(|a| a.unix_uid);
        Ok(accounts)
    }

    async fn uid_exists(&self, uid: i64, exclude_id: i64) -> RepoResult<bool> {
        let state = self.state.lock();
        let result = state
            .live_accounts()
            .any(|a| a.unix_uid == uid && (exclude_id == 0 || a.id != exclude_id));
        Ok(result)
    }

    async fn username_exists(&self, username: &str, exclude_id: i64) -> RepoResult<bool> {
        let state = self.state.lock();
        let result = state
            .live_accounts()
            .any(|a| a.username == username && (exclude_id == 0 || a.id != exclude_id));
        Ok(result)
    }

    async fn max_uid(&self, account_type: IdentityType) -> RepoResult<Option<i64>> {
        let state = self.state.lock();
        Ok(state
            .live_accounts()
            .filter(|a| a.account_type == account_type)
            .map(|a| a.unix_uid)
            .max())
    }

    async fn count_with_primary_group(&self, group_id: i64) -> RepoResult<i64> {
        let state = self.state.lock();
        let count = state
            .live_accounts()
            .filter(|a| a.primary_group_id == Some(group_id))
            .count();
        Ok(count as i64)
    }
}

#[async_trait]
impl GroupRepository for MemoryRegistry {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Group>> {
        Ok(self.state.lock().live_groups().find(|g| g.id == id).cloned())
    }

    async fn find_by_gid(&self, gid: i64) -> RepoResult<Option<Group>> {
        let state = self.state.lock();
        let result = state.live_groups().find(|g| g.unix_gid == gid).cloned();
        Ok(result)
    }

    async fn find_by_groupname(&self, groupname: &str) -> RepoResult<Option<Group>> {
        let state = self.state.lock();
        let result = state.live_groups().find(|g| g.groupname == groupname).cloned();
        Ok(result)
    }

    async fn find_all(&self, group_type: Option<IdentityType>) -> RepoResult<Vec<Group>> {
        let state = self.state.lock();
        let mut groups: Vec<Group> = state
            .live_groups()
            .filter(|g| group_type.map_or(true, |t| g.group_type == t))
            .cloned()
            .collect();
        groups.sort_by_key(|g| g.unix_gid);
        Ok(groups)
    }

    async fn search(&self, query: &str) -> RepoResult<Vec<Group>> {
        let state = self.state.lock();
        let mut groups: Vec<Group> = state
            .live_groups()
            .filter(|g| g.groupname.contains(query) || g.unix_gid.to_string().contains(query))
            .cloned()
            .collect();
        groups.sort_by_key(|g| g.unix_gid);
        Ok(groups)
    }

    async fn find_by_account(&self, account_id: i64) -> RepoResult<Vec<Group>> {
        let state = self.state.lock();
        let mut groups: Vec<Group> = state
            .live_groups()
            .filter(|g| {
                state
                    .memberships
                    .iter()
                    .any(|m| m.account_id == account_id && m.group_id == g.id)
            })
            .cloned()
            .collect();
        groups.sort_by_key(|g| g.unix_gid);
        Ok(groups)
    }

    async fn gid_exists(&self, gid: i64, exclude_id: i64) -> RepoResult<bool> {
        let state = self.state.lock();
        let result = state
            .live_groups()
            .any(|g| g.unix_gid == gid && (exclude_id == 0 || g.id != exclude_id));
        Ok(result)
    }

    async fn groupname_exists(&self, groupname: &str, exclude_id: i64) -> RepoResult<bool> {
        let state = self.state.lock();
        let result = state
            .live_groups()
            .any(|g| g.groupname == groupname && (exclude_id == 0 || g.id != exclude_id));
        Ok(result)
    }

    async fn max_gid(&self, group_type: IdentityType) -> RepoResult<Option<i64>> {
        let state = self.state.lock();
        Ok(state
            .live_groups()
            .filter(|g| g.group_type == group_type)
            .map(|g| g.unix_gid)
            .max())
    }
}

#[async_trait]
impl MembershipRepository for MemoryRegistry {
    async fn exists(&self, account_id: i64, group_id: i64) -> RepoResult<bool> {
        let state = self.state.lock();
        Ok(state
            .memberships
            .iter()
            .any(|m| m.account_id == account_id && m.group_id == group_id))
    }
}

#[async_trait]
impl AuditRepository for MemoryRegistry {
    async fn find(&self, query: &AuditQuery) -> RepoResult<Vec<AuditEntry>> {
        let query = query.clone().normalized();
        let state = self.state.lock();
        let mut entries: Vec<AuditEntry> = state
            .audit
            .iter()
            .filter(|e| query.matches(e))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(entries
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<AuditEntry>> {
        Ok(self.state.lock().audit.iter().find(|e| e.id == id).cloned())
    }
}

#[async_trait]
impl RegistryStore for MemoryRegistry {
    async fn begin(&self) -> RepoResult<Box<dyn RegistryTransaction>> {
        let working = self.state.lock().clone();
        Ok(Box::new(MemoryTransaction {
            shared: Arc::clone(&self.state),
            fail_audit: Arc::clone(&self.fail_audit),
            sequence: Arc::clone(&self.sequence),
            working,
            log: Vec::new(),
        }))
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}

struct MemoryTransaction {
    shared: Arc<Mutex<State>>,
    fail_audit: Arc<AtomicBool>,
    sequence: Arc<AtomicI64>,
    working: State,
    log: Vec<Write>,
}

impl MemoryTransaction {
    /// Ids come from one registry-wide sequence, like a BIGSERIAL
    fn next_id(&self) -> i64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn write(&mut self, write: Write) -> RepoResult<()> {
        self.working.apply(&write)?;
        self.log.push(write);
        Ok(())
    }
}

#[async_trait]
impl RegistryTransaction for MemoryTransaction {
    async fn insert_account(&mut self, draft: &AccountDraft) -> RepoResult<Account> {
        let mut account = Account::new(draft.unix_uid, draft.username.clone(), draft.account_type);
        account.id = self.next_id();
        account.primary_group_id = draft.primary_group_id;
        account.first_name = draft.first_name.clone();
        account.last_name = draft.last_name.clone();
        self.write(Write::InsertAccount(account.clone()))?;
        Ok(account)
    }

    async fn update_account(&mut self, id: i64, draft: &AccountDraft) -> RepoResult<Account> {
        let mut account = self.working.live_account_mut(id)?.clone();
        account.unix_uid = draft.unix_uid;
        account.username = draft.username.clone();
        account.account_type = draft.account_type;
        account.primary_group_id = draft.primary_group_id;
        account.first_name = draft.first_name.clone();
        account.last_name = draft.last_name.clone();
        account.touch();
        self.write(Write::UpdateAccount(account.clone()))?;
        Ok(account)
    }

    async fn soft_delete_account(&mut self, id: i64) -> RepoResult<()> {
        self.write(Write::DeleteAccount(id))
    }

    async fn insert_group(&mut self, draft: &GroupDraft) -> RepoResult<Group> {
        let mut group = Group::new(draft.unix_gid, draft.groupname.clone(), draft.group_type);
        group.id = self.next_id();
        group.description = draft.description.clone();
        group.created_by = draft.created_by.clone();
        self.write(Write::InsertGroup(group.clone()))?;
        Ok(group)
    }

    async fn update_group(&mut self, id: i64, draft: &GroupDraft) -> RepoResult<Group> {
        let mut group = self.working.live_group_mut(id)?.clone();
        group.unix_gid = draft.unix_gid;
        group.groupname = draft.groupname.clone();
        group.group_type = draft.group_type;
        group.description = draft.description.clone();
        group.updated_at = Utc::now();
        self.write(Write::UpdateGroup(group.clone()))?;
        Ok(group)
    }

    async fn soft_delete_group(&mut self, id: i64) -> RepoResult<()> {
        self.write(Write::DeleteGroup(id))
    }

    async fn insert_membership(&mut self, account_id: i64, group_id: i64) -> RepoResult<Membership> {
        let membership = Membership::new(account_id, group_id);
        self.write(Write::InsertMembership(membership.clone()))?;
        Ok(membership)
    }

    async fn delete_membership(&mut self, account_id: i64, group_id: i64) -> RepoResult<bool> {
        let existed = self
            .working
            .memberships
            .iter()
            .any(|m| m.account_id == account_id && m.group_id == group_id);
        if existed {
            self.write(Write::DeleteMembership {
                account_id,
                group_id,
            })?;
        }
        Ok(existed)
    }

    async fn append_audit(&mut self, entry: &NewAuditEntry) -> RepoResult<AuditEntry> {
        if self.fail_audit.load(Ordering::SeqCst) {
            return Err(DomainError::AuditWriteFailed("audit table unavailable".to_string()));
        }
        let stored = AuditEntry {
            id: self.next_id(),
            action: entry.action,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            details: entry.details.clone(),
            user_id: entry.user_id,
            username: entry.username.clone(),
            ip_address: entry.ip_address.clone(),
            timestamp: Utc::now(),
        };
        self.write(Write::Audit(stored.clone()))?;
        Ok(stored)
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let this = *self;
        let mut live = this.shared.lock();
        let mut next = live.clone();
        for write in &this.log {
            next.apply(write)?;
        }
        *live = next;
        Ok(())
    }
}

/// Service context wired to a single in-memory registry
pub fn context(registry: &Arc<MemoryRegistry>) -> ServiceContext {
    ServiceContext::new(
        registry.clone(),
        registry.clone(),
        registry.clone(),
        registry.clone(),
        registry.clone(),
        RangePolicy::default(),
    )
}

pub fn actor() -> Actor {
    Actor::new(1, "admin", "10.0.0.1")
}
