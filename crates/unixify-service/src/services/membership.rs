//! Membership service
//!
//! Assigns accounts to secondary groups and removes them again. Assignment
//! is gated by the account/group type compatibility table.

use tracing::{info, instrument};

use unixify_core::entities::{Account, AuditAction, AuditEntityType, Group, NewAuditEntry};
use unixify_core::error::DomainError;
use unixify_core::is_compatible;
use unixify_core::value_objects::Actor;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::pipeline::AuditedWrite;

/// Membership service
pub struct MembershipService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MembershipService<'a> {
    /// Create a new MembershipService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add an account to a group
    #[instrument(skip(self))]
    pub async fn assign_account_to_group(
        &self,
        account_id: i64,
        group_id: i64,
        actor: &Actor,
    ) -> ServiceResult<()> {
        let (account, group) = self.load_pair(account_id, group_id).await?;

        if !is_compatible(account.account_type, group.group_type) {
            return Err(DomainError::IncompatibleTypes {
                account_type: account.account_type,
                group_type: group.group_type,
            }
            .into());
        }

        if self.ctx.membership_repo().exists(account_id, group_id).await? {
            return Err(DomainError::AlreadyMember {
                account_id,
                group_id,
            }
            .into());
        }

        let mut write = AuditedWrite::begin(self.ctx).await?;
        write.tx().insert_membership(account_id, group_id).await?;
        write
            .finish(NewAuditEntry::new(
                actor,
                AuditAction::Assign,
                AuditEntityType::AccountGroup,
                account_id,
                format!(
                    "Assigned account {} (ID: {}) to group {} (ID: {})",
                    account.username, account_id, group.groupname, group_id
                ),
            ))
            .await?;

        info!(account_id, group_id, actor = %actor.username, "Account assigned to group");

        Ok(())
    }

    /// Remove an account from a group
    #[instrument(skip(self))]
    pub async fn remove_account_from_group(
        &self,
        account_id: i64,
        group_id: i64,
        actor: &Actor,
    ) -> ServiceResult<()> {
        let (account, group) = self.load_pair(account_id, group_id).await?;

        let mut write = AuditedWrite::begin(self.ctx).await?;
        if !write.tx().delete_membership(account_id, group_id).await? {
            return Err(DomainError::MembershipNotFound {
                account_id,
                group_id,
            }
            .into());
        }
        write
            .finish(NewAuditEntry::new(
                actor,
                AuditAction::Remove,
                AuditEntityType::AccountGroup,
                account_id,
                format!(
                    "Removed account {} (ID: {}) from group {} (ID: {})",
                    account.username, account_id, group.groupname, group_id
                ),
            ))
            .await?;

        info!(account_id, group_id, actor = %actor.username, "Account removed from group");

        Ok(())
    }

    /// Both sides must exist and not be soft-deleted
    async fn load_pair(&self, account_id: i64, group_id: i64) -> ServiceResult<(Account, Group)> {
        let account = self
            .ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or(DomainError::AccountNotFound(account_id))?;
        let group = self
            .ctx
            .group_repo()
            .find_by_id(group_id)
            .await?
            .ok_or(DomainError::GroupNotFound(group_id))?;
        Ok((account, group))
    }
}
