//! Account entity - a UNIX user account record

use chrono::{DateTime, Utc};

use crate::value_objects::IdentityType;

/// Account entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub unix_uid: i64,
    pub username: String,
    pub account_type: IdentityType,
    pub primary_group_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Build an account that has not been stored yet (`id == 0`)
    pub fn new(unix_uid: i64, username: String, account_type: IdentityType) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            unix_uid,
            username,
            account_type,
            primary_group_id: None,
            first_name: None,
            last_name: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    #[inline]
    pub fn is_system(&self) -> bool {
        self.account_type.is_system()
    }

    /// "First Last", falling back to whichever part is present
    pub fn full_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(name), None) | (None, Some(name)) => Some(name.to_string()),
            (None, None) => None,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Fields the store needs to insert or overwrite an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDraft {
    pub unix_uid: i64,
    pub username: String,
    pub account_type: IdentityType,
    pub primary_group_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<&Account> for AccountDraft {
    fn from(account: &Account) -> Self {
        Self {
            unix_uid: account.unix_uid,
            username: account.username.clone(),
            account_type: account.account_type,
            primary_group_id: account.primary_group_id,
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
        }
    }
}
