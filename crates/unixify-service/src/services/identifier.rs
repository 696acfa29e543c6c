//! Identifier service
//!
//! Next free UID/GID per type, duplicate checks and range validation.

use tracing::{debug, instrument};

use unixify_core::value_objects::{IdKind, IdentityType};
use unixify_core::IdOutcome;

use crate::dto::{DuplicateCheckResponse, NextIdResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Identifier service
pub struct IdentifierService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> IdentifierService<'a> {
    /// Create a new IdentifierService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Propose the next UID for an account type
    #[instrument(skip(self))]
    pub async fn next_available_uid(&self, account_type: &str) -> ServiceResult<NextIdResponse> {
        let ty = IdentityType::parse(account_type)?;
        let next = self.next_uid(ty).await?;
        Ok(NextIdResponse {
            kind: IdKind::Uid,
            identity_type: ty,
            next,
            range: self.ctx.range_policy().range_for(IdKind::Uid, ty),
        })
    }

    /// Propose the next GID for a group type
    #[instrument(skip(self))]
    pub async fn next_available_gid(&self, group_type: &str) -> ServiceResult<NextIdResponse> {
        let ty = IdentityType::parse(group_type)?;
        let next = self.next_gid(ty).await?;
        Ok(NextIdResponse {
            kind: IdKind::Gid,
            identity_type: ty,
            next,
            range: self.ctx.range_policy().range_for(IdKind::Gid, ty),
        })
    }

    /// Max live UID of the type plus one, or the bottom of its range
    pub async fn next_uid(&self, ty: IdentityType) -> ServiceResult<i64> {
        let max = self.ctx.account_repo().max_uid(ty).await?;
        let next = self.ctx.allocator(IdKind::Uid).next_after(max, ty);
        debug!(identity_type = %ty, ?max, next, "Proposed UID");
        Ok(next)
    }

    /// Max live GID of the type plus one, or the bottom of its range
    pub async fn next_gid(&self, ty: IdentityType) -> ServiceResult<i64> {
        let max = self.ctx.group_repo().max_gid(ty).await?;
        let next = self.ctx.allocator(IdKind::Gid).next_after(max, ty);
        debug!(identity_type = %ty, ?max, next, "Proposed GID");
        Ok(next)
    }

    /// Whether a live account other than `exclude_id` holds the UID
    #[instrument(skip(self))]
    pub async fn is_uid_duplicate(
        &self,
        uid: i64,
        exclude_id: i64,
    ) -> ServiceResult<DuplicateCheckResponse> {
        let duplicate = self.ctx.account_repo().uid_exists(uid, exclude_id).await?;
        Ok(DuplicateCheckResponse {
            kind: IdKind::Uid,
            id: uid,
            exclude_id,
            duplicate,
        })
    }

    /// Whether a live group other than `exclude_id` holds the GID
    #[instrument(skip(self))]
    pub async fn is_gid_duplicate(
        &self,
        gid: i64,
        exclude_id: i64,
    ) -> ServiceResult<DuplicateCheckResponse> {
        let duplicate = self.ctx.group_repo().gid_exists(gid, exclude_id).await?;
        Ok(DuplicateCheckResponse {
            kind: IdKind::Gid,
            id: gid,
            exclude_id,
            duplicate,
        })
    }

    pub fn validate_uid(&self, uid: i64, account_type: &str) -> IdOutcome {
        self.ctx.validator(IdKind::Uid).validate_named(uid, account_type)
    }

    pub fn validate_gid(&self, gid: i64, group_type: &str) -> IdOutcome {
        self.ctx.validator(IdKind::Gid).validate_named(gid, group_type)
    }
}
