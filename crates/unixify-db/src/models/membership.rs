//! Membership database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for account_groups table
#[derive(Debug, Clone, FromRow)]
pub struct MembershipModel {
    pub account_id: i64,
    pub group_id: i64,
    pub created_at: DateTime<Utc>,
}
