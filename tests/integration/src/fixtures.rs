//! Test fixtures and data generators
//!
//! Provides reusable request bodies and response shapes for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Distinguishes names created by this run from earlier runs
static RUN_ID: OnceLock<String> = OnceLock::new();

fn run_id() -> &'static str {
    RUN_ID.get_or_init(|| format!("{:x}", chrono::Utc::now().timestamp_micros() % 0xff_ffff))
}

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Unique lowercase UNIX name with the given prefix
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}{}x{}", run_id(), unique_suffix())
}

/// Create account request
#[derive(Debug, Clone, Serialize)]
pub struct CreateAccountRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unix_uid: Option<i64>,
    pub username: String,
    pub account_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_group_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl CreateAccountRequest {
    /// Account of the given type with an allocated UID
    pub fn unique(account_type: &str) -> Self {
        Self {
            unix_uid: None,
            username: unique_name("acct"),
            account_type: account_type.to_string(),
            primary_group_id: None,
            first_name: None,
            last_name: None,
        }
    }
}

/// Create group request
#[derive(Debug, Clone, Serialize)]
pub struct CreateGroupRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unix_gid: Option<i64>,
    pub groupname: String,
    pub group_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateGroupRequest {
    /// Group of the given type with an allocated GID
    pub fn unique(group_type: &str) -> Self {
        Self {
            unix_gid: None,
            groupname: unique_name("grp"),
            group_type: group_type.to_string(),
            description: Some("integration test group".to_string()),
        }
    }
}

/// Membership request body
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MembershipRequest {
    pub account_id: i64,
    pub group_id: i64,
}

/// Mutation result with range warnings
#[derive(Debug, Deserialize)]
pub struct Applied<T> {
    pub record: T,
    pub warnings: Vec<WarningResponse>,
}

/// Range warning
#[derive(Debug, Deserialize)]
pub struct WarningResponse {
    pub kind: String,
    pub id: i64,
    #[serde(rename = "type")]
    pub identity_type: String,
    pub message: String,
}

/// Account response
#[derive(Debug, Deserialize)]
pub struct AccountResponse {
    pub id: i64,
    pub unix_uid: i64,
    pub username: String,
    pub account_type: String,
    pub primary_group_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Group response
#[derive(Debug, Deserialize)]
pub struct GroupResponse {
    pub id: i64,
    pub unix_gid: i64,
    pub groupname: String,
    pub group_type: String,
    pub description: String,
    pub created_by: Option<String>,
}

/// Next free identifier
#[derive(Debug, Deserialize)]
pub struct NextIdResponse {
    pub kind: String,
    #[serde(rename = "type")]
    pub identity_type: String,
    pub next: i64,
}

/// Duplicate check result
#[derive(Debug, Deserialize)]
pub struct DuplicateCheckResponse {
    pub id: i64,
    pub exclude_id: i64,
    pub duplicate: bool,
}

/// Audit entry
#[derive(Debug, Deserialize)]
pub struct AuditEntryResponse {
    pub id: i64,
    pub action: String,
    pub entity_type: String,
    pub entity_id: i64,
    pub details: String,
    pub user_id: i64,
    pub username: String,
    pub ip_address: String,
}
