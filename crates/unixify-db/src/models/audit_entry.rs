//! Audit entry database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for audit_entries table
#[derive(Debug, Clone, FromRow)]
pub struct AuditEntryModel {
    pub id: i64,
    pub action: String,
    pub entity_type: String,
    pub entity_id: i64,
    pub details: String,
    pub user_id: i64,
    pub username: String,
    pub ip_address: String,
    pub occurred_at: DateTime<Utc>,
}
