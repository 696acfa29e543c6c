//! PostgreSQL implementation of GroupRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use unixify_core::entities::Group;
use unixify_core::traits::{GroupRepository, RepoResult};
use unixify_core::value_objects::IdentityType;

use crate::mappers::groups_from_models;
use crate::models::GroupModel;

use super::account::escape_like;
use super::error::map_db_error;

pub(crate) const GROUP_COLUMNS: &str = "id, unix_gid, groupname, group_type, description, \
     created_by, created_at, updated_at, deleted_at";

/// PostgreSQL implementation of GroupRepository
#[derive(Clone)]
pub struct PgGroupRepository {
    pool: PgPool,
}

impl PgGroupRepository {
    /// Create a new PgGroupRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupRepository for PgGroupRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Group>> {
        let sql =
            format!("SELECT {GROUP_COLUMNS} FROM groups WHERE id = $1 AND deleted_at IS NULL");
        let result = sqlx::query_as::<_, GroupModel>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Group::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_gid(&self, gid: i64) -> RepoResult<Option<Group>> {
        let sql = format!(
            "SELECT {GROUP_COLUMNS} FROM groups WHERE unix_gid = $1 AND deleted_at IS NULL"
        );
        let result = sqlx::query_as::<_, GroupModel>(&sql)
            .bind(gid)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Group::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_groupname(&self, groupname: &str) -> RepoResult<Option<Group>> {
        let sql = format!(
            "SELECT {GROUP_COLUMNS} FROM groups WHERE groupname = $1 AND deleted_at IS NULL"
        );
        let result = sqlx::query_as::<_, GroupModel>(&sql)
            .bind(groupname)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Group::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_all(&self, group_type: Option<IdentityType>) -> RepoResult<Vec<Group>> {
        let sql = format!(
            r#"
            SELECT {GROUP_COLUMNS}
            FROM groups
            WHERE deleted_at IS NULL AND ($1::TEXT IS NULL OR group_type = $1)
            ORDER BY unix_gid
            "#
        );
        let results = sqlx::query_as::<_, GroupModel>(&sql)
            .bind(group_type.map(IdentityType::as_str))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        groups_from_models(results)
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> RepoResult<Vec<Group>> {
        let sql = format!(
            r#"
            SELECT {GROUP_COLUMNS}
            FROM groups
            WHERE deleted_at IS NULL
              AND (groupname LIKE $1 OR CAST(unix_gid AS TEXT) LIKE $1)
            ORDER BY unix_gid
            "#
        );
        let results = sqlx::query_as::<_, GroupModel>(&sql)
            .bind(format!("%{}%", escape_like(query)))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        groups_from_models(results)
    }

    #[instrument(skip(self))]
    async fn find_by_account(&self, account_id: i64) -> RepoResult<Vec<Group>> {
        let results = sqlx::query_as::<_, GroupModel>(
            r#"
            SELECT g.id, g.unix_gid, g.groupname, g.group_type, g.description,
                   g.created_by, g.created_at, g.updated_at, g.deleted_at
            FROM groups g
            JOIN account_groups ag ON ag.group_id = g.id
            WHERE ag.account_id = $1 AND g.deleted_at IS NULL
            ORDER BY g.unix_gid
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        groups_from_models(results)
    }

    #[instrument(skip(self))]
    async fn gid_exists(&self, gid: i64, exclude_id: i64) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM groups
                WHERE unix_gid = $1 AND deleted_at IS NULL AND ($2 = 0 OR id <> $2)
            )
            "#,
        )
        .bind(gid)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn groupname_exists(&self, groupname: &str, exclude_id: i64) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM groups
                WHERE groupname = $1 AND deleted_at IS NULL AND ($2 = 0 OR id <> $2)
            )
            "#,
        )
        .bind(groupname)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn max_gid(&self, group_type: IdentityType) -> RepoResult<Option<i64>> {
        sqlx::query_scalar::<_, Option<i64>>(
            r#"
            SELECT MAX(unix_gid) FROM groups
            WHERE group_type = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(group_type.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
