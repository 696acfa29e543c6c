//! PostgreSQL implementation of AccountRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use unixify_core::entities::Account;
use unixify_core::traits::{AccountRepository, RepoResult};
use unixify_core::value_objects::IdentityType;

use crate::mappers::accounts_from_models;
use crate::models::AccountModel;

use super::error::map_db_error;

pub(crate) const ACCOUNT_COLUMNS: &str = "id, unix_uid, username, account_type, primary_group_id, \
     first_name, last_name, created_at, updated_at, deleted_at";

/// PostgreSQL implementation of AccountRepository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    /// Create a new PgAccountRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Account>> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1 AND deleted_at IS NULL"
        );
        let result = sqlx::query_as::<_, AccountModel>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Account::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_uid(&self, uid: i64) -> RepoResult<Option<Account>> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE unix_uid = $1 AND deleted_at IS NULL"
        );
        let result = sqlx::query_as::<_, AccountModel>(&sql)
            .bind(uid)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Account::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = $1 AND deleted_at IS NULL"
        );
        let result = sqlx::query_as::<_, AccountModel>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Account::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_all(&self, account_type: Option<IdentityType>) -> RepoResult<Vec<Account>> {
        let sql = format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM accounts
            WHERE deleted_at IS NULL AND ($1::TEXT IS NULL OR account_type = $1)
            ORDER BY unix_uid
            "#
        );
        let results = sqlx::query_as::<_, AccountModel>(&sql)
            .bind(account_type.map(IdentityType::as_str))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        accounts_from_models(results)
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> RepoResult<Vec<Account>> {
        let sql = format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM accounts
            WHERE deleted_at IS NULL
              AND (username LIKE $1 OR CAST(unix_uid AS TEXT) LIKE $1)
            ORDER BY unix_uid
            "#
        );
        let results = sqlx::query_as::<_, AccountModel>(&sql)
            .bind(format!("%{}%", escape_like(query)))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        accounts_from_models(results)
    }

    #[instrument(skip(self))]
    async fn find_by_group(&self, group_id: i64) -> RepoResult<Vec<Account>> {
        let results = sqlx::query_as::<_, AccountModel>(
            r#"
            SELECT a.id, a.unix_uid, a.username, a.account_type, a.primary_group_id,
                   a.first_name, a.last_name, a.created_at, a.updated_at, a.deleted_at
            FROM accounts a
            JOIN account_groups ag ON ag.account_id = a.id
            WHERE ag.group_id = $1 AND a.deleted_at IS NULL
            ORDER BY a.unix_uid
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        accounts_from_models(results)
    }

    #[instrument(skip(self))]
    async fn uid_exists(&self, uid: i64, exclude_id: i64) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM accounts
                WHERE unix_uid = $1 AND deleted_at IS NULL AND ($2 = 0 OR id <> $2)
            )
            "#,
        )
        .bind(uid)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn username_exists(&self, username: &str, exclude_id: i64) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM accounts
                WHERE username = $1 AND deleted_at IS NULL AND ($2 = 0 OR id <> $2)
            )
            "#,
        )
        .bind(username)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn max_uid(&self, account_type: IdentityType) -> RepoResult<Option<i64>> {
        sqlx::query_scalar::<_, Option<i64>>(
            r#"
            SELECT MAX(unix_uid) FROM accounts
            WHERE account_type = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(account_type.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn count_with_primary_group(&self, group_id: i64) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM accounts
            WHERE primary_group_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(group_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}

/// Escape LIKE wildcards so user input matches literally
pub(crate) fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
