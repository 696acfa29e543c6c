//! PostgreSQL implementation of RegistryStore / RegistryTransaction

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use unixify_core::entities::{
    Account, AccountDraft, AuditEntry, Group, GroupDraft, Membership, NewAuditEntry,
};
use unixify_core::error::DomainError;
use unixify_core::traits::{RegistryStore, RegistryTransaction, RepoResult};

use crate::models::{AccountModel, AuditEntryModel, GroupModel, MembershipModel};

use super::account::ACCOUNT_COLUMNS;
use super::error::{
    account_not_found, group_not_found, map_account_write_error, map_db_error,
    map_group_write_error, map_membership_write_error,
};
use super::group::GROUP_COLUMNS;

/// Opens transactions on a PostgreSQL pool
#[derive(Clone)]
pub struct PgRegistryStore {
    pool: PgPool,
}

impl PgRegistryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistryStore for PgRegistryStore {
    #[instrument(skip(self))]
    async fn begin(&self) -> RepoResult<Box<dyn RegistryTransaction>> {
        let tx = self.pool.begin().await.map_err(map_db_error)?;
        Ok(Box::new(PgRegistryTransaction { tx }))
    }

    #[instrument(skip(self))]
    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}

/// A live database transaction; rolled back on drop unless committed
pub struct PgRegistryTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl RegistryTransaction for PgRegistryTransaction {
    #[instrument(skip(self, draft), fields(uid = draft.unix_uid, username = %draft.username))]
    async fn insert_account(&mut self, draft: &AccountDraft) -> RepoResult<Account> {
        let sql = format!(
            r#"
            INSERT INTO accounts (unix_uid, username, account_type, primary_group_id,
                                  first_name, last_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        );
        let model = sqlx::query_as::<_, AccountModel>(&sql)
            .bind(draft.unix_uid)
            .bind(&draft.username)
            .bind(draft.account_type.as_str())
            .bind(draft.primary_group_id)
            .bind(&draft.first_name)
            .bind(&draft.last_name)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| map_account_write_error(e, draft))?;

        Account::try_from(model)
    }

    #[instrument(skip(self, draft), fields(uid = draft.unix_uid, username = %draft.username))]
    async fn update_account(&mut self, id: i64, draft: &AccountDraft) -> RepoResult<Account> {
        let sql = format!(
            r#"
            UPDATE accounts
            SET unix_uid = $2, username = $3, account_type = $4, primary_group_id = $5,
                first_name = $6, last_name = $7, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {ACCOUNT_COLUMNS}
            "#
        );
        let model = sqlx::query_as::<_, AccountModel>(&sql)
            .bind(id)
            .bind(draft.unix_uid)
            .bind(&draft.username)
            .bind(draft.account_type.as_str())
            .bind(draft.primary_group_id)
            .bind(&draft.first_name)
            .bind(&draft.last_name)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| map_account_write_error(e, draft))?
            .ok_or_else(|| account_not_found(id))?;

        Account::try_from(model)
    }

    #[instrument(skip(self))]
    async fn soft_delete_account(&mut self, id: i64) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(account_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self, draft), fields(gid = draft.unix_gid, groupname = %draft.groupname))]
    async fn insert_group(&mut self, draft: &GroupDraft) -> RepoResult<Group> {
        let sql = format!(
            r#"
            INSERT INTO groups (unix_gid, groupname, group_type, description, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {GROUP_COLUMNS}
            "#
        );
        let model = sqlx::query_as::<_, GroupModel>(&sql)
            .bind(draft.unix_gid)
            .bind(&draft.groupname)
            .bind(draft.group_type.as_str())
            .bind(&draft.description)
            .bind(&draft.created_by)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| map_group_write_error(e, draft))?;

        Group::try_from(model)
    }

    #[instrument(skip(self, draft), fields(gid = draft.unix_gid, groupname = %draft.groupname))]
    async fn update_group(&mut self, id: i64, draft: &GroupDraft) -> RepoResult<Group> {
        let sql = format!(
            r#"
            UPDATE groups
            SET unix_gid = $2, groupname = $3, group_type = $4, description = $5,
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {GROUP_COLUMNS}
            "#
        );
        let model = sqlx::query_as::<_, GroupModel>(&sql)
            .bind(id)
            .bind(draft.unix_gid)
            .bind(&draft.groupname)
            .bind(draft.group_type.as_str())
            .bind(&draft.description)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| map_group_write_error(e, draft))?
            .ok_or_else(|| group_not_found(id))?;

        Group::try_from(model)
    }

    #[instrument(skip(self))]
    async fn soft_delete_group(&mut self, id: i64) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE groups
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(group_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn insert_membership(
        &mut self,
        account_id: i64,
        group_id: i64,
    ) -> RepoResult<Membership> {
        let model = sqlx::query_as::<_, MembershipModel>(
            r#"
            INSERT INTO account_groups (account_id, group_id)
            VALUES ($1, $2)
            RETURNING account_id, group_id, created_at
            "#,
        )
        .bind(account_id)
        .bind(group_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_membership_write_error(e, account_id, group_id))?;

        Ok(Membership::from(model))
    }

    #[instrument(skip(self))]
    async fn delete_membership(&mut self, account_id: i64, group_id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM account_groups
            WHERE account_id = $1 AND group_id = $2
            "#,
        )
        .bind(account_id)
        .bind(group_id)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, entry), fields(action = %entry.action, entity_type = %entry.entity_type, entity_id = entry.entity_id))]
    async fn append_audit(&mut self, entry: &NewAuditEntry) -> RepoResult<AuditEntry> {
        let model = sqlx::query_as::<_, AuditEntryModel>(
            r#"
            INSERT INTO audit_entries (action, entity_type, entity_id, details, user_id,
                                       username, ip_address)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, action, entity_type, entity_id, details, user_id, username,
                      ip_address, occurred_at
            "#,
        )
        .bind(entry.action.as_str())
        .bind(entry.entity_type.as_str())
        .bind(entry.entity_id)
        .bind(&entry.details)
        .bind(entry.user_id)
        .bind(&entry.username)
        .bind(&entry.ip_address)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| DomainError::AuditWriteFailed(e.to_string()))?;

        AuditEntry::try_from(model)
    }

    #[instrument(skip(self))]
    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.tx.commit().await.map_err(map_db_error)
    }
}
