//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Identity types travel as plain strings so that an unknown type surfaces as
//! an `INVALID_TYPE` domain error instead of a JSON decoding failure.

use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Longest login or group name accepted by common UNIX tooling
pub const MAX_NAME_LEN: usize = 32;

/// Lowercase letter or underscore first, then lowercase letters, digits,
/// `_` or `-`, with an optional trailing `$` for machine accounts.
pub fn validate_unix_name(name: &str) -> Result<(), ValidationError> {
    let body = name.strip_suffix('$').unwrap_or(name);
    let mut chars = body.chars();

    let valid_first = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_');
    let valid_rest =
        chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');

    if valid_first && valid_rest {
        Ok(())
    } else {
        let mut err = ValidationError::new("unix_name");
        err.message = Some(
            "must start with a lowercase letter or underscore and contain only a-z, 0-9, '_' or '-'"
                .into(),
        );
        Err(err)
    }
}

// ============================================================================
// Account Requests
// ============================================================================

/// Create account request
///
/// `unix_uid` is proposed by the allocator when omitted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAccountRequest {
    pub unix_uid: Option<i64>,

    #[validate(
        length(min = 1, max = 32, message = "Username must be 1-32 characters"),
        custom(function = "validate_unix_name")
    )]
    pub username: String,

    pub account_type: String,

    pub primary_group_id: Option<i64>,

    #[validate(length(max = 64, message = "First name must be at most 64 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 64, message = "Last name must be at most 64 characters"))]
    pub last_name: Option<String>,
}

/// Update account request
///
/// Absent fields keep their stored value. `clear_primary_group` drops the
/// primary group; it wins over `primary_group_id`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    pub unix_uid: Option<i64>,

    #[validate(
        length(min = 1, max = 32, message = "Username must be 1-32 characters"),
        custom(function = "validate_unix_name")
    )]
    pub username: Option<String>,

    pub account_type: Option<String>,

    pub primary_group_id: Option<i64>,

    #[serde(default)]
    pub clear_primary_group: bool,

    #[validate(length(max = 64, message = "First name must be at most 64 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 64, message = "Last name must be at most 64 characters"))]
    pub last_name: Option<String>,
}

// ============================================================================
// Group Requests
// ============================================================================

/// Create group request
///
/// `unix_gid` is proposed by the allocator when omitted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGroupRequest {
    pub unix_gid: Option<i64>,

    #[validate(
        length(min = 1, max = 32, message = "Group name must be 1-32 characters"),
        custom(function = "validate_unix_name")
    )]
    pub groupname: String,

    pub group_type: String,

    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    pub description: Option<String>,
}

/// Update group request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateGroupRequest {
    pub unix_gid: Option<i64>,

    #[validate(
        length(min = 1, max = 32, message = "Group name must be 1-32 characters"),
        custom(function = "validate_unix_name")
    )]
    pub groupname: Option<String>,

    pub group_type: Option<String>,

    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    pub description: Option<String>,
}

// ============================================================================
// Membership Requests
// ============================================================================

/// Assign or remove a secondary group membership
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct MembershipRequest {
    #[validate(range(min = 1, message = "account_id must be positive"))]
    pub account_id: i64,

    #[validate(range(min = 1, message = "group_id must be positive"))]
    pub group_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_name_rules() {
        assert!(validate_unix_name("alice").is_ok());
        assert!(validate_unix_name("_daemon").is_ok());
        assert!(validate_unix_name("web-01").is_ok());
        assert!(validate_unix_name("host$").is_ok());

        assert!(validate_unix_name("").is_err());
        assert!(validate_unix_name("Alice").is_err());
        assert!(validate_unix_name("1user").is_err());
        assert!(validate_unix_name("bad name").is_err());
        assert!(validate_unix_name("$").is_err());
    }

    #[test]
    fn test_create_account_validation() {
        let request: CreateAccountRequest = serde_json::from_str(
            r#"{"unix_uid": 1500, "username": "alice", "account_type": "people"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.primary_group_id, None);

        let request = CreateAccountRequest {
            username: "x".repeat(MAX_NAME_LEN + 1),
            ..request
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
    }

    #[test]
    fn test_update_account_partial_body() {
        let request: UpdateAccountRequest =
            serde_json::from_str(r#"{"first_name": "Alice"}"#).unwrap();
        assert!(request.validate().is_ok());
        assert!(request.username.is_none());
        assert!(!request.clear_primary_group);

        let request = UpdateAccountRequest {
            username: Some("NotValid".to_string()),
            ..UpdateAccountRequest::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_membership_request_requires_positive_ids() {
        let request = MembershipRequest {
            account_id: 0,
            group_id: 4,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("account_id"));
    }
}
