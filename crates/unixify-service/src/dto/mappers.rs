//! Entity to DTO mappers
//!
//! Conversions from domain entities and policy values to response DTOs.

use unixify_core::entities::{Account, AuditEntry, Group};
use unixify_core::{IdOutcome, RangeWarning};

use super::responses::{
    AccountResponse, AuditEntryResponse, GroupResponse, ValidationOutcomeResponse,
    WarningResponse,
};

// ============================================================================
// Account Mappers
// ============================================================================

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            unix_uid: account.unix_uid,
            username: account.username.clone(),
            account_type: account.account_type,
            primary_group_id: account.primary_group_id,
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self::from(&account)
    }
}

// ============================================================================
// Group Mappers
// ============================================================================

impl From<&Group> for GroupResponse {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id,
            unix_gid: group.unix_gid,
            groupname: group.groupname.clone(),
            group_type: group.group_type,
            description: group.description.clone(),
            created_by: group.created_by.clone(),
            created_at: group.created_at,
            updated_at: group.updated_at,
        }
    }
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self::from(&group)
    }
}

// ============================================================================
// Audit Mappers
// ============================================================================

impl From<AuditEntry> for AuditEntryResponse {
    fn from(entry: AuditEntry) -> Self {
        Self {
            id: entry.id,
            action: entry.action.as_str().to_string(),
            entity_type: entry.entity_type.as_str().to_string(),
            entity_id: entry.entity_id,
            details: entry.details,
            user_id: entry.user_id,
            username: entry.username,
            ip_address: entry.ip_address,
            timestamp: entry.timestamp,
        }
    }
}

// ============================================================================
// Policy Mappers
// ============================================================================

impl From<&RangeWarning> for WarningResponse {
    fn from(warning: &RangeWarning) -> Self {
        Self {
            kind: warning.kind,
            id: warning.id,
            identity_type: warning.identity_type,
            range: warning.range,
            message: warning.message(),
        }
    }
}

impl From<IdOutcome> for ValidationOutcomeResponse {
    fn from(outcome: IdOutcome) -> Self {
        match outcome {
            IdOutcome::Ok => Self::Ok,
            IdOutcome::Warning(w) => Self::Warning {
                message: w.message(),
                range: w.range,
            },
            IdOutcome::Invalid(reason) => Self::Invalid {
                message: reason.to_string(),
            },
        }
    }
}
