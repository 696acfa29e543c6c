//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use unixify_core::entities::{AccountDraft, GroupDraft};
use unixify_core::error::DomainError;

/// Unique constraints whose violation is a domain conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    AccountUid,
    AccountUsername,
    GroupGid,
    GroupGroupname,
    Membership,
}

impl UniqueKey {
    /// Map a PostgreSQL constraint / index name to the key it guards
    pub fn from_constraint(name: &str) -> Option<Self> {
        match name {
            "accounts_unix_uid_active_key" => Some(Self::AccountUid),
            "accounts_username_active_key" => Some(Self::AccountUsername),
            "groups_unix_gid_active_key" => Some(Self::GroupGid),
            "groups_groupname_active_key" => Some(Self::GroupGroupname),
            "account_groups_pkey" => Some(Self::Membership),
            _ => None,
        }
    }
}

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce(Option<UniqueKey>) -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique(db_err.constraint().and_then(UniqueKey::from_constraint));
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Map an insert/update failure on the accounts table
pub fn map_account_write_error(e: SqlxError, draft: &AccountDraft) -> DomainError {
    if is_foreign_key_violation(&e) {
        return match draft.primary_group_id {
            Some(id) => DomainError::MissingReference { entity: "group", id },
            None => map_db_error(e),
        };
    }
    map_unique_violation(e, |key| match key {
        Some(UniqueKey::AccountUsername) => DomainError::UsernameTaken(draft.username.clone()),
        _ => DomainError::UidTaken(draft.unix_uid),
    })
}

/// Map an insert/update failure on the groups table
pub fn map_group_write_error(e: SqlxError, draft: &GroupDraft) -> DomainError {
    map_unique_violation(e, |key| match key {
        Some(UniqueKey::GroupGroupname) => DomainError::GroupnameTaken(draft.groupname.clone()),
        _ => DomainError::GidTaken(draft.unix_gid),
    })
}

/// Map an insert failure on account_groups
pub fn map_membership_write_error(e: SqlxError, account_id: i64, group_id: i64) -> DomainError {
    if is_foreign_key_violation(&e) {
        let constraint = e
            .as_database_error()
            .and_then(|db| db.constraint())
            .unwrap_or_default();
        return if constraint.ends_with("group_id_fkey") {
            DomainError::MissingReference {
                entity: "group",
                id: group_id,
            }
        } else {
            DomainError::MissingReference {
                entity: "account",
                id: account_id,
            }
        };
    }
    map_unique_violation(e, |_| DomainError::AlreadyMember {
        account_id,
        group_id,
    })
}

fn is_foreign_key_violation(e: &SqlxError) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation())
}

/// Create an "account not found" error
pub fn account_not_found(id: i64) -> DomainError {
    DomainError::AccountNotFound(id)
}

/// Create a "group not found" error
pub fn group_not_found(id: i64) -> DomainError {
    DomainError::GroupNotFound(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_names() {
        assert_eq!(
            UniqueKey::from_constraint("accounts_unix_uid_active_key"),
            Some(UniqueKey::AccountUid)
        );
        assert_eq!(
            UniqueKey::from_constraint("accounts_username_active_key"),
            Some(UniqueKey::AccountUsername)
        );
        assert_eq!(
            UniqueKey::from_constraint("groups_unix_gid_active_key"),
            Some(UniqueKey::GroupGid)
        );
        assert_eq!(
            UniqueKey::from_constraint("groups_groupname_active_key"),
            Some(UniqueKey::GroupGroupname)
        );
        assert_eq!(
            UniqueKey::from_constraint("account_groups_pkey"),
            Some(UniqueKey::Membership)
        );
        assert_eq!(UniqueKey::from_constraint("accounts_pkey"), None);
    }

    #[test]
    fn test_non_database_error_is_persistence() {
        let err = map_unique_violation(SqlxError::RowNotFound, |_| DomainError::UidTaken(1));
        assert!(matches!(err, DomainError::DatabaseError(_)));
    }
}
