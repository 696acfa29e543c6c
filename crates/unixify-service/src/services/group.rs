//! Group service
//!
//! Handles group creation, updates, soft deletion and lookups.

use tracing::{info, instrument};
use validator::Validate;

use unixify_core::entities::{AuditAction, AuditEntityType, Group, GroupDraft, NewAuditEntry};
use unixify_core::error::DomainError;
use unixify_core::value_objects::{Actor, IdKind, IdentityType};
use unixify_core::RangeWarning;

use crate::dto::{
    AccountResponse, Applied, CreateGroupRequest, GroupResponse, UpdateGroupRequest,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::identifier::IdentifierService;
use super::pipeline::{log_warnings, AuditedWrite};

/// Group service
pub struct GroupService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GroupService<'a> {
    /// Create a new GroupService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a group, allocating a GID when none is given
    #[instrument(skip(self, request), fields(groupname = %request.groupname))]
    pub async fn create_group(
        &self,
        request: CreateGroupRequest,
        actor: &Actor,
    ) -> ServiceResult<Applied<GroupResponse>> {
        request.validate()?;
        let group_type = IdentityType::parse(&request.group_type)?;

        let unix_gid = match request.unix_gid {
            Some(gid) => gid,
            None => IdentifierService::new(self.ctx).next_gid(group_type).await?,
        };
        let warnings: Vec<RangeWarning> = self
            .ctx
            .validator(IdKind::Gid)
            .validate(unix_gid, group_type)
            .into_result(IdKind::Gid)?
            .into_iter()
            .collect();

        let draft = GroupDraft {
            unix_gid,
            groupname: request.groupname,
            group_type,
            description: request.description.unwrap_or_default(),
            created_by: Some(actor.username.clone()),
        };

        self.ensure_unique(&draft, 0).await?;

        let mut write = AuditedWrite::begin(self.ctx).await?;
        let group = write.tx().insert_group(&draft).await?;
        write
            .finish(NewAuditEntry::new(
                actor,
                AuditAction::Create,
                AuditEntityType::Group,
                group.id,
                format!("Created group {} with GID {}", group.groupname, group.unix_gid),
            ))
            .await?;

        log_warnings(&warnings);
        info!(
            group_id = group.id,
            gid = group.unix_gid,
            group_type = %group.group_type,
            actor = %actor.username,
            "Group created"
        );

        Ok(Applied::new(GroupResponse::from(group), warnings))
    }

    /// Update a group in place; absent fields keep their value
    ///
    /// The type of a group that is still someone's primary group is frozen.
    #[instrument(skip(self, request))]
    pub async fn update_group(
        &self,
        group_id: i64,
        request: UpdateGroupRequest,
        actor: &Actor,
    ) -> ServiceResult<Applied<GroupResponse>> {
        request.validate()?;
        let existing = self.find_group(group_id).await?;

        let mut draft = GroupDraft::from(&existing);
        if let Some(gid) = request.unix_gid {
            draft.unix_gid = gid;
        }
        if let Some(groupname) = request.groupname {
            draft.groupname = groupname;
        }
        if let Some(ref ty) = request.group_type {
            draft.group_type = IdentityType::parse(ty)?;
        }
        if let Some(description) = request.description {
            draft.description = description;
        }

        let warnings: Vec<RangeWarning> = self
            .ctx
            .validator(IdKind::Gid)
            .validate(draft.unix_gid, draft.group_type)
            .into_result(IdKind::Gid)?
            .into_iter()
            .collect();

        self.ensure_unique(&draft, group_id).await?;
        if draft.group_type != existing.group_type {
            self.ensure_not_primary(group_id).await?;
        }

        let changes = describe_changes(&existing, &draft);

        let mut write = AuditedWrite::begin(self.ctx).await?;
        let group = write.tx().update_group(group_id, &draft).await?;
        let mut details = format!("Updated group {} with GID {}", group.groupname, group.unix_gid);
        if !changes.is_empty() {
            details.push_str(" (");
            details.push_str(&changes.join(", "));
            details.push(')');
        }
        write
            .finish(NewAuditEntry::new(
                actor,
                AuditAction::Update,
                AuditEntityType::Group,
                group.id,
                details,
            ))
            .await?;

        log_warnings(&warnings);
        info!(
            group_id = group.id,
            changed = changes.len(),
            actor = %actor.username,
            "Group updated"
        );

        Ok(Applied::new(GroupResponse::from(group), warnings))
    }

    /// Soft-delete a group that no account uses as primary group
    #[instrument(skip(self))]
    pub async fn delete_group(&self, group_id: i64, actor: &Actor) -> ServiceResult<()> {
        let existing = self.find_group(group_id).await?;
        self.ensure_not_primary(group_id).await?;

        let mut write = AuditedWrite::begin(self.ctx).await?;
        write.tx().soft_delete_group(group_id).await?;
        write
            .finish(NewAuditEntry::new(
                actor,
                AuditAction::Delete,
                AuditEntityType::Group,
                group_id,
                format!(
                    "Deleted group {} with GID {}",
                    existing.groupname, existing.unix_gid
                ),
            ))
            .await?;

        info!(group_id, actor = %actor.username, "Group deleted");

        Ok(())
    }

    /// Get a group by ID
    #[instrument(skip(self))]
    pub async fn get_group(&self, group_id: i64) -> ServiceResult<GroupResponse> {
        let group = self.find_group(group_id).await?;
        Ok(GroupResponse::from(group))
    }

    /// List groups, optionally of one type
    #[instrument(skip(self))]
    pub async fn list_groups(&self, group_type: Option<&str>) -> ServiceResult<Vec<GroupResponse>> {
        let group_type = group_type.map(IdentityType::parse).transpose()?;
        let groups = self.ctx.group_repo().find_all(group_type).await?;
        Ok(groups.into_iter().map(GroupResponse::from).collect())
    }

    /// Groups whose name or GID contains `query`, optionally of one type
    #[instrument(skip(self))]
    pub async fn search_groups(
        &self,
        query: &str,
        group_type: Option<&str>,
    ) -> ServiceResult<Vec<GroupResponse>> {
        let group_type = group_type.map(IdentityType::parse).transpose()?;
        let groups = self.ctx.group_repo().search(query.trim()).await?;
        Ok(groups
            .into_iter()
            .filter(|g| group_type.map_or(true, |t| g.group_type == t))
            .map(GroupResponse::from)
            .collect())
    }

    /// Live group holding a GID
    #[instrument(skip(self))]
    pub async fn get_group_by_gid(&self, gid: i64) -> ServiceResult<GroupResponse> {
        let group = self
            .ctx
            .group_repo()
            .find_by_gid(gid)
            .await?
            .ok_or_else(|| DomainError::GroupNotFoundBy {
                field: "GID",
                value: gid.to_string(),
            })?;
        Ok(GroupResponse::from(group))
    }

    /// Live group with a groupname
    #[instrument(skip(self))]
    pub async fn get_group_by_groupname(&self, groupname: &str) -> ServiceResult<GroupResponse> {
        let group = self
            .ctx
            .group_repo()
            .find_by_groupname(groupname)
            .await?
            .ok_or_else(|| DomainError::GroupNotFoundBy {
                field: "groupname",
                value: groupname.to_string(),
            })?;
        Ok(GroupResponse::from(group))
    }

    /// Secondary members of a group
    #[instrument(skip(self))]
    pub async fn get_group_members(&self, group_id: i64) -> ServiceResult<Vec<AccountResponse>> {
        self.find_group(group_id).await?;
        let accounts = self.ctx.account_repo().find_by_group(group_id).await?;
        Ok(accounts.into_iter().map(AccountResponse::from).collect())
    }

    // =========================================================================
    // Helper Methods
    // =========================================================================

    async fn find_group(&self, group_id: i64) -> ServiceResult<Group> {
        let group = self
            .ctx
            .group_repo()
            .find_by_id(group_id)
            .await?
            .ok_or(DomainError::GroupNotFound(group_id))?;
        Ok(group)
    }

    async fn ensure_unique(&self, draft: &GroupDraft, exclude_id: i64) -> ServiceResult<()> {
        let repo = self.ctx.group_repo();
        if repo.gid_exists(draft.unix_gid, exclude_id).await? {
            return Err(DomainError::GidTaken(draft.unix_gid).into());
        }
        if repo.groupname_exists(&draft.groupname, exclude_id).await? {
            return Err(DomainError::GroupnameTaken(draft.groupname.clone()).into());
        }
        Ok(())
    }

    async fn ensure_not_primary(&self, group_id: i64) -> ServiceResult<()> {
        let accounts = self
            .ctx
            .account_repo()
            .count_with_primary_group(group_id)
            .await?;
        if accounts > 0 {
            return Err(DomainError::GroupInUse { group_id, accounts }.into());
        }
        Ok(())
    }
}

fn describe_changes(before: &Group, after: &GroupDraft) -> Vec<String> {
    let mut changes = Vec::new();
    if before.unix_gid != after.unix_gid {
        changes.push(format!("gid {} -> {}", before.unix_gid, after.unix_gid));
    }
    if before.groupname != after.groupname {
        changes.push(format!("groupname {} -> {}", before.groupname, after.groupname));
    }
    if before.group_type != after.group_type {
        changes.push(format!("type {} -> {}", before.group_type, after.group_type));
    }
    if before.description != after.description {
        changes.push("description".to_string());
    }
    changes
}
