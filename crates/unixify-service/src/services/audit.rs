//! Audit service
//!
//! Read-only access to the audit trail.

use tracing::instrument;

use unixify_core::entities::AuditQuery;
use unixify_core::error::DomainError;

use crate::dto::AuditEntryResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Audit service
pub struct AuditService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuditService<'a> {
    /// Create a new AuditService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Entries matching every given filter, newest first
    #[instrument(skip(self))]
    pub async fn list_entries(&self, query: AuditQuery) -> ServiceResult<Vec<AuditEntryResponse>> {
        let entries = self.ctx.audit_repo().find(&query.normalized()).await?;
        Ok(entries.into_iter().map(AuditEntryResponse::from).collect())
    }

    /// Get one audit entry by ID
    #[instrument(skip(self))]
    pub async fn get_entry(&self, id: i64) -> ServiceResult<AuditEntryResponse> {
        let entry = self
            .ctx
            .audit_repo()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::AuditEntryNotFound(id))?;
        Ok(AuditEntryResponse::from(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{CreateAccountRequest, CreateGroupRequest, UpdateAccountRequest};
    use crate::services::{AccountService, GroupService};
    use crate::test_support::{actor, context, MemoryRegistry};
    use unixify_core::entities::{AuditAction, AuditEntityType};
    use unixify_core::value_objects::Actor;

    async fn seed(ctx: &ServiceContext) -> i64 {
        let accounts = AccountService::new(ctx);
        let alice = accounts
            .create_account(
                CreateAccountRequest {
                    unix_uid: Some(1500),
                    username: "alice".to_string(),
                    account_type: "people".to_string(),
                    primary_group_id: None,
                    first_name: None,
                    last_name: None,
                },
                &actor(),
            )
            .await
            .unwrap();
        accounts
            .update_account(
                alice.record.id,
                UpdateAccountRequest {
                    last_name: Some("Liddell".to_string()),
                    ..UpdateAccountRequest::default()
                },
                &Actor::new(2, "operator", "10.0.0.2"),
            )
            .await
            .unwrap();
        GroupService::new(ctx)
            .create_group(
                CreateGroupRequest {
                    unix_gid: Some(1100),
                    groupname: "staff".to_string(),
                    group_type: "people".to_string(),
                    description: None,
                },
                &actor(),
            )
            .await
            .unwrap();
        alice.record.id
    }

    #[tokio::test]
    async fn test_filters_are_combined() {
        let registry = MemoryRegistry::new();
        let ctx = context(&registry);
        let alice = seed(&ctx).await;
        let service = AuditService::new(&ctx);

        assert_eq!(service.list_entries(AuditQuery::new()).await.unwrap().len(), 3);

        let account_entries = service
            .list_entries(AuditQuery {
                entity_type: Some(AuditEntityType::Account),
                entity_id: Some(alice),
                ..AuditQuery::new()
            })
            .await
            .unwrap();
        assert_eq!(account_entries.len(), 2);
        // newest first
        assert_eq!(account_entries[0].action, "update");
        assert_eq!(account_entries[1].action, "create");

        let by_operator = service
            .list_entries(AuditQuery {
                user_id: Some(2),
                action: Some(AuditAction::Update),
                ..AuditQuery::new()
            })
            .await
            .unwrap();
        assert_eq!(by_operator.len(), 1);
        assert_eq!(by_operator[0].username, "operator");
    }

    #[tokio::test]
    async fn test_paging() {
        let registry = MemoryRegistry::new();
        let ctx = context(&registry);
        seed(&ctx).await;
        let service = AuditService::new(&ctx);

        let page = service
            .list_entries(AuditQuery {
                limit: 2,
                offset: 2,
                ..AuditQuery::new()
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].entity_type, "account");
    }

    #[tokio::test]
    async fn test_get_entry() {
        let registry = MemoryRegistry::new();
        let ctx = context(&registry);
        seed(&ctx).await;
        let service = AuditService::new(&ctx);

        let first = registry.audit_entries()[0].id;
        let entry = service.get_entry(first).await.unwrap();
        assert_eq!(entry.details, "Created account alice with UID 1500");

        let err = service.get_entry(9999).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "UNKNOWN_AUDIT_ENTRY");
    }
}
