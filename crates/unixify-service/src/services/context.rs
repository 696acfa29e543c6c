//! Service context - dependency container for services
//!
//! Holds the repositories, the transactional store and the identifier range
//! policy needed by services.

use std::sync::Arc;

use unixify_core::traits::{
    AccountRepository, AuditRepository, GroupRepository, MembershipRepository, RegistryStore,
};
use unixify_core::value_objects::IdKind;
use unixify_core::{IdAllocator, IdValidator, RangePolicy};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Read repositories for accounts, groups, memberships and audit entries
/// - The registry store that opens write transactions
/// - The identifier range policy
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    account_repo: Arc<dyn AccountRepository>,
    group_repo: Arc<dyn GroupRepository>,
    membership_repo: Arc<dyn MembershipRepository>,
    audit_repo: Arc<dyn AuditRepository>,

    // Writes
    store: Arc<dyn RegistryStore>,

    // Policy
    range_policy: RangePolicy,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        account_repo: Arc<dyn AccountRepository>,
        group_repo: Arc<dyn GroupRepository>,
        membership_repo: Arc<dyn MembershipRepository>,
        audit_repo: Arc<dyn AuditRepository>,
        store: Arc<dyn RegistryStore>,
        range_policy: RangePolicy,
    ) -> Self {
        Self {
            account_repo,
            group_repo,
            membership_repo,
            audit_repo,
            store,
            range_policy,
        }
    }

    // === Repositories ===

    /// Get the account repository
    pub fn account_repo(&self) -> &dyn AccountRepository {
        self.account_repo.as_ref()
    }

    /// Get the group repository
    pub fn group_repo(&self) -> &dyn GroupRepository {
        self.group_repo.as_ref()
    }

    /// Get the membership repository
    pub fn membership_repo(&self) -> &dyn MembershipRepository {
        self.membership_repo.as_ref()
    }

    /// Get the audit repository
    pub fn audit_repo(&self) -> &dyn AuditRepository {
        self.audit_repo.as_ref()
    }

    // === Store ===

    /// Get the transactional registry store
    pub fn store(&self) -> &dyn RegistryStore {
        self.store.as_ref()
    }

    // === Policy ===

    /// Get the identifier range policy
    pub fn range_policy(&self) -> &RangePolicy {
        &self.range_policy
    }

    /// Validator for UIDs or GIDs under the configured policy
    pub fn validator(&self, kind: IdKind) -> IdValidator<'_> {
        IdValidator::new(&self.range_policy, kind)
    }

    /// Allocator for UIDs or GIDs under the configured policy
    pub fn allocator(&self, kind: IdKind) -> IdAllocator<'_> {
        IdAllocator::new(&self.range_policy, kind)
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("store", &"RegistryStore")
            .field("range_policy", &self.range_policy)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    account_repo: Option<Arc<dyn AccountRepository>>,
    group_repo: Option<Arc<dyn GroupRepository>>,
    membership_repo: Option<Arc<dyn MembershipRepository>>,
    audit_repo: Option<Arc<dyn AuditRepository>>,
    store: Option<Arc<dyn RegistryStore>>,
    range_policy: Option<RangePolicy>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            account_repo: None,
            group_repo: None,
            membership_repo: None,
            audit_repo: None,
            store: None,
            range_policy: None,
        }
    }

    pub fn account_repo(mut self, repo: Arc<dyn AccountRepository>) -> Self {
        self.account_repo = Some(repo);
        self
    }

    pub fn group_repo(mut self, repo: Arc<dyn GroupRepository>) -> Self {
        self.group_repo = Some(repo);
        self
    }

    pub fn membership_repo(mut self, repo: Arc<dyn MembershipRepository>) -> Self {
        self.membership_repo = Some(repo);
        self
    }

    pub fn audit_repo(mut self, repo: Arc<dyn AuditRepository>) -> Self {
        self.audit_repo = Some(repo);
        self
    }

    pub fn store(mut self, store: Arc<dyn RegistryStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn range_policy(mut self, policy: RangePolicy) -> Self {
        self.range_policy = Some(policy);
        self
    }

    /// Build the ServiceContext
    ///
    /// The range policy falls back to the standard table when not set.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.account_repo
                .ok_or_else(|| ServiceError::validation("account_repo is required"))?,
            self.group_repo
                .ok_or_else(|| ServiceError::validation("group_repo is required"))?,
            self.membership_repo
                .ok_or_else(|| ServiceError::validation("membership_repo is required"))?,
            self.audit_repo
                .ok_or_else(|| ServiceError::validation("audit_repo is required"))?,
            self.store
                .ok_or_else(|| ServiceError::validation("store is required"))?,
            self.range_policy.unwrap_or_default(),
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
