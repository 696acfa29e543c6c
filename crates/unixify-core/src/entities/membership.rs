//! Membership entity - an account's secondary group

use chrono::{DateTime, Utc};

/// (account, group) join row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub account_id: i64,
    pub group_id: i64,
    pub created_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(account_id: i64, group_id: i64) -> Self {
        Self {
            account_id,
            group_id,
            created_at: Utc::now(),
        }
    }
}
