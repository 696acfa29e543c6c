//! PostgreSQL implementation of MembershipRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use unixify_core::traits::{MembershipRepository, RepoResult};

use super::error::map_db_error;

/// PostgreSQL implementation of MembershipRepository
#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    #[instrument(skip(self))]
    async fn exists(&self, account_id: i64, group_id: i64) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM account_groups WHERE account_id = $1 AND group_id = $2
            )
            "#,
        )
        .bind(account_id)
        .bind(group_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
