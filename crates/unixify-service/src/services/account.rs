//! Account service
//!
//! Handles account creation, updates, soft deletion and lookups. Every
//! mutation goes through validation, uniqueness and primary-group checks
//! before it is written together with its audit entry.

use tracing::{info, instrument};
use validator::Validate;

use unixify_core::entities::{
    Account, AccountDraft, AuditAction, AuditEntityType, NewAuditEntry,
};
use unixify_core::error::DomainError;
use unixify_core::value_objects::{Actor, IdKind, IdentityType};
use unixify_core::RangeWarning;

use crate::dto::{
    AccountResponse, Applied, CreateAccountRequest, GroupResponse, UpdateAccountRequest,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::identifier::IdentifierService;
use super::pipeline::{log_warnings, AuditedWrite};

/// Account service
pub struct AccountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountService<'a> {
    /// Create a new AccountService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an account, allocating a UID when none is given
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn create_account(
        &self,
        request: CreateAccountRequest,
        actor: &Actor,
    ) -> ServiceResult<Applied<AccountResponse>> {
        request.validate()?;
        let account_type = IdentityType::parse(&request.account_type)?;

        let unix_uid = match request.unix_uid {
            Some(uid) => uid,
            None => IdentifierService::new(self.ctx).next_uid(account_type).await?,
        };
        let warnings: Vec<RangeWarning> = self
            .ctx
            .validator(IdKind::Uid)
            .validate(unix_uid, account_type)
            .into_result(IdKind::Uid)?
            .into_iter()
            .collect();

        let draft = AccountDraft {
            unix_uid,
            username: request.username,
            account_type,
            primary_group_id: request.primary_group_id,
            first_name: request.first_name,
            last_name: request.last_name,
        };

        self.ensure_unique(&draft, 0).await?;
        self.ensure_primary_group(draft.account_type, draft.primary_group_id)
            .await?;

        let mut write = AuditedWrite::begin(self.ctx).await?;
        let account = write.tx().insert_account(&draft).await?;
        write
            .finish(NewAuditEntry::new(
                actor,
                AuditAction::Create,
                AuditEntityType::Account,
                account.id,
                format!(
                    "Created account {} with UID {}",
                    account.username, account.unix_uid
                ),
            ))
            .await?;

        log_warnings(&warnings);
        info!(
            account_id = account.id,
            uid = account.unix_uid,
            account_type = %account.account_type,
            actor = %actor.username,
            "Account created"
        );

        Ok(Applied::new(AccountResponse::from(account), warnings))
    }

    /// Update an account in place; absent fields keep their value
    #[instrument(skip(self, request))]
    pub async fn update_account(
        &self,
        account_id: i64,
        request: UpdateAccountRequest,
        actor: &Actor,
    ) -> ServiceResult<Applied<AccountResponse>> {
        request.validate()?;
        let existing = self.find_account(account_id).await?;

        let mut draft = AccountDraft::from(&existing);
        if let Some(uid) = request.unix_uid {
            draft.unix_uid = uid;
        }
        if let Some(username) = request.username {
            draft.username = username;
        }
        if let Some(ref ty) = request.account_type {
            draft.account_type = IdentityType::parse(ty)?;
        }
        if request.clear_primary_group {
            draft.primary_group_id = None;
        } else if let Some(group_id) = request.primary_group_id {
            draft.primary_group_id = Some(group_id);
        }
        if request.first_name.is_some() {
            draft.first_name = request.first_name;
        }
        if request.last_name.is_some() {
            draft.last_name = request.last_name;
        }

        let warnings: Vec<RangeWarning> = self
            .ctx
            .validator(IdKind::Uid)
            .validate(draft.unix_uid, draft.account_type)
            .into_result(IdKind::Uid)?
            .into_iter()
            .collect();

        self.ensure_unique(&draft, account_id).await?;
        self.ensure_primary_group(draft.account_type, draft.primary_group_id)
            .await?;

        let changes = describe_changes(&existing, &draft);

        let mut write = AuditedWrite::begin(self.ctx).await?;
        let account = write.tx().update_account(account_id, &draft).await?;
        let mut details = format!(
            "Updated account {} with UID {}",
            account.username, account.unix_uid
        );
        if !changes.is_empty() {
            details.push_str(" (");
            details.push_str(&changes.join(", "));
            details.push(')');
        }
        write
            .finish(NewAuditEntry::new(
                actor,
                AuditAction::Update,
                AuditEntityType::Account,
                account.id,
                details,
            ))
            .await?;

        log_warnings(&warnings);
        info!(
            account_id = account.id,
            changed = changes.len(),
            actor = %actor.username,
            "Account updated"
        );

        Ok(Applied::new(AccountResponse::from(account), warnings))
    }

    /// Soft-delete an account
    #[instrument(skip(self))]
    pub async fn delete_account(&self, account_id: i64, actor: &Actor) -> ServiceResult<()> {
        let existing = self.find_account(account_id).await?;

        let mut write = AuditedWrite::begin(self.ctx).await?;
        write.tx().soft_delete_account(account_id).await?;
        write
            .finish(NewAuditEntry::new(
                actor,
                AuditAction::Delete,
                AuditEntityType::Account,
                account_id,
                format!(
                    "Deleted account {} with UID {}",
                    existing.username, existing.unix_uid
                ),
            ))
            .await?;

        info!(account_id, actor = %actor.username, "Account deleted");

        Ok(())
    }

    /// Get an account by ID
    #[instrument(skip(self))]
    pub async fn get_account(&self, account_id: i64) -> ServiceResult<AccountResponse> {
        let account = self.find_account(account_id).await?;
        Ok(AccountResponse::from(account))
    }

    /// List accounts, optionally of one type
    #[instrument(skip(self))]
    pub async fn list_accounts(
        &self,
        account_type: Option<&str>,
    ) -> ServiceResult<Vec<AccountResponse>> {
        let account_type = account_type.map(IdentityType::parse).transpose()?;
        let accounts = self.ctx.account_repo().find_all(account_type).await?;
        Ok(accounts.into_iter().map(AccountResponse::from).collect())
    }

    /// Accounts whose username or UID contains `query`, optionally of one type
    #[instrument(skip(self))]
    pub async fn search_accounts(
        &self,
        query: &str,
        account_type: Option<&str>,
    ) -> ServiceResult<Vec<AccountResponse>> {
        let account_type = account_type.map(IdentityType::parse).transpose()?;
        let accounts = self.ctx.account_repo().search(query.trim()).await?;
        Ok(accounts
            .into_iter()
            .filter(|a| account_type.map_or(true, |t| a.account_type == t))
            .map(AccountResponse::from)
            .collect())
    }

    /// Live account holding a UID
    #[instrument(skip(self))]
    pub async fn get_account_by_uid(&self, uid: i64) -> ServiceResult<AccountResponse> {
        let account = self
            .ctx
            .account_repo()
            .find_by_uid(uid)
            .await?
            .ok_or_else(|| DomainError::AccountNotFoundBy {
                field: "UID",
                value: uid.to_string(),
            })?;
        Ok(AccountResponse::from(account))
    }

    /// Live account with a username
    #[instrument(skip(self))]
    pub async fn get_account_by_username(&self, username: &str) -> ServiceResult<AccountResponse> {
        let account = self
            .ctx
            .account_repo()
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::AccountNotFoundBy {
                field: "username",
                value: username.to_string(),
            })?;
        Ok(AccountResponse::from(account))
    }

    /// Secondary groups of an account
    #[instrument(skip(self))]
    pub async fn get_account_groups(&self, account_id: i64) -> ServiceResult<Vec<GroupResponse>> {
        self.find_account(account_id).await?;
        let groups = self.ctx.group_repo().find_by_account(account_id).await?;
        Ok(groups.into_iter().map(GroupResponse::from).collect())
    }

    // =========================================================================
    // Helper Methods
    // =========================================================================

    async fn find_account(&self, account_id: i64) -> ServiceResult<Account> {
        let account = self
            .ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or(DomainError::AccountNotFound(account_id))?;
        Ok(account)
    }

    async fn ensure_unique(&self, draft: &AccountDraft, exclude_id: i64) -> ServiceResult<()> {
        let repo = self.ctx.account_repo();
        if repo.uid_exists(draft.unix_uid, exclude_id).await? {
            return Err(DomainError::UidTaken(draft.unix_uid).into());
        }
        if repo.username_exists(&draft.username, exclude_id).await? {
            return Err(DomainError::UsernameTaken(draft.username.clone()).into());
        }
        Ok(())
    }

    /// System accounts need a live system group as primary group; other
    /// accounts only need their primary group, if any, to exist.
    async fn ensure_primary_group(
        &self,
        account_type: IdentityType,
        primary_group_id: Option<i64>,
    ) -> ServiceResult<()> {
        let Some(group_id) = primary_group_id else {
            if account_type.is_system() {
                return Err(DomainError::PrimaryGroupRequired.into());
            }
            return Ok(());
        };

        let group = self
            .ctx
            .group_repo()
            .find_by_id(group_id)
            .await?
            .ok_or(DomainError::MissingReference {
                entity: "group",
                id: group_id,
            })?;

        if account_type.is_system() && !group.is_system() {
            return Err(DomainError::PrimaryGroupNotSystem {
                group_id,
                group_type: group.group_type,
            }
            .into());
        }

        Ok(())
    }
}

/// `field old -> new` for every field an update changes
fn describe_changes(before: &Account, after: &AccountDraft) -> Vec<String> {
    fn show(value: Option<&str>) -> &str {
        value.unwrap_or("none")
    }

    let mut changes = Vec::new();
    if before.unix_uid != after.unix_uid {
        changes.push(format!("uid {} -> {}", before.unix_uid, after.unix_uid));
    }
    if before.username != after.username {
        changes.push(format!("username {} -> {}", before.username, after.username));
    }
    if before.account_type != after.account_type {
        changes.push(format!("type {} -> {}", before.account_type, after.account_type));
    }
    if before.primary_group_id != after.primary_group_id {
        changes.push(format!(
            "primary group {} -> {}",
            show(before.primary_group_id.map(|id| id.to_string()).as_deref()),
            show(after.primary_group_id.map(|id| id.to_string()).as_deref())
        ));
    }
    if before.first_name != after.first_name {
        changes.push(format!(
            "first name {} -> {}",
            show(before.first_name.as_deref()),
            show(after.first_name.as_deref())
        ));
    }
    if before.last_name != after.last_name {
        changes.push(format!(
            "last name {} -> {}",
            show(before.last_name.as_deref()),
            show(after.last_name.as_deref())
        ));
    }
    changes
}
