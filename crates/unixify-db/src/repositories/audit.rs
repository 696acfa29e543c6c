//! PostgreSQL implementation of AuditRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use unixify_core::entities::{AuditAction, AuditEntityType, AuditEntry, AuditQuery};
use unixify_core::traits::{AuditRepository, RepoResult};

use crate::models::AuditEntryModel;

use super::error::map_db_error;

/// PostgreSQL implementation of AuditRepository
#[derive(Clone)]
pub struct PgAuditRepository {
    pool: PgPool,
}

impl PgAuditRepository {
    /// Create a new PgAuditRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PgAuditRepository {
    #[instrument(skip(self))]
    async fn find(&self, query: &AuditQuery) -> RepoResult<Vec<AuditEntry>> {
        let query = query.clone().normalized();

        let results = sqlx::query_as::<_, AuditEntryModel>(
            r#"
            SELECT id, action, entity_type, entity_id, details, user_id, username,
                   ip_address, occurred_at
            FROM audit_entries
            WHERE ($1::TEXT IS NULL OR entity_type = $1)
              AND ($2::TEXT IS NULL OR action = $2)
              AND ($3::BIGINT IS NULL OR entity_id = $3)
              AND ($4::BIGINT IS NULL OR user_id = $4)
            ORDER BY occurred_at DESC, id DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(query.entity_type.map(AuditEntityType::as_str))
        .bind(query.action.map(AuditAction::as_str))
        .bind(query.entity_id)
        .bind(query.user_id)
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(AuditEntry::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<AuditEntry>> {
        let result = sqlx::query_as::<_, AuditEntryModel>(
            r#"
            SELECT id, action, entity_type, entity_id, details, user_id, username,
                   ip_address, occurred_at
            FROM audit_entries
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(AuditEntry::try_from).transpose()
    }
}
