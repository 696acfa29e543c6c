//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use serde::Serialize;

use unixify_core::{IdKind, IdRange, IdentityType, RangeWarning};

// ============================================================================
// Common Response Types
// ============================================================================

/// Mutation result with the non-blocking range warnings raised on the way
#[derive(Debug, Clone, Serialize)]
pub struct Applied<T> {
    pub record: T,
    pub warnings: Vec<WarningResponse>,
}

impl<T> Applied<T> {
    pub fn new(record: T, warnings: Vec<RangeWarning>) -> Self {
        Self {
            record,
            warnings: warnings.iter().map(WarningResponse::from).collect(),
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Applied<U> {
        Applied {
            record: f(self.record),
            warnings: self.warnings,
        }
    }
}

/// A range warning as shown to API clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarningResponse {
    pub kind: IdKind,
    pub id: i64,
    #[serde(rename = "type")]
    pub identity_type: IdentityType,
    pub range: IdRange,
    pub message: String,
}

// ============================================================================
// Account Responses
// ============================================================================

/// Account response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountResponse {
    pub id: i64,
    pub unix_uid: i64,
    pub username: String,
    pub account_type: IdentityType,
    pub primary_group_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Group Responses
// ============================================================================

/// Group response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupResponse {
    pub id: i64,
    pub unix_gid: i64,
    pub groupname: String,
    pub group_type: IdentityType,
    pub description: String,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Identifier Responses
// ============================================================================

/// Next free identifier for a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextIdResponse {
    pub kind: IdKind,
    #[serde(rename = "type")]
    pub identity_type: IdentityType,
    pub next: i64,
    pub range: IdRange,
}

/// Whether an identifier is already held by a live record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateCheckResponse {
    pub kind: IdKind,
    pub id: i64,
    pub exclude_id: i64,
    pub duplicate: bool,
}

/// Tagged identifier validation outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ValidationOutcomeResponse {
    Ok,
    Warning { message: String, range: IdRange },
    Invalid { message: String },
}

// ============================================================================
// Audit Responses
// ============================================================================

/// Audit entry response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntryResponse {
    pub id: i64,
    pub action: String,
    pub entity_type: String,
    pub entity_id: i64,
    pub details: String,
    pub user_id: i64,
    pub username: String,
    pub ip_address: String,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
