//! Audit entry entity - one immutable record per registry mutation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::Actor;

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Assign,
    Remove,
}

impl AuditAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Assign => "assign",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "assign" => Ok(Self::Assign),
            "remove" => Ok(Self::Remove),
            other => Err(DomainError::ValidationError(format!(
                "unknown audit action: {other}"
            ))),
        }
    }
}

/// What kind of record it happened to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntityType {
    Account,
    Group,
    AccountGroup,
}

impl AuditEntityType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Group => "group",
            Self::AccountGroup => "account_group",
        }
    }
}

impl fmt::Display for AuditEntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditEntityType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "account" => Ok(Self::Account),
            "group" => Ok(Self::Group),
            "account_group" => Ok(Self::AccountGroup),
            other => Err(DomainError::ValidationError(format!(
                "unknown audit entity type: {other}"
            ))),
        }
    }
}

/// Stored audit entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub id: i64,
    pub action: AuditAction,
    pub entity_type: AuditEntityType,
    pub entity_id: i64,
    pub details: String,
    pub user_id: i64,
    pub username: String,
    pub ip_address: String,
    pub timestamp: DateTime<Utc>,
}

/// Audit entry about to be appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub action: AuditAction,
    pub entity_type: AuditEntityType,
    pub entity_id: i64,
    pub details: String,
    pub user_id: i64,
    pub username: String,
    pub ip_address: String,
}

impl NewAuditEntry {
    pub fn new(
        actor: &Actor,
        action: AuditAction,
        entity_type: AuditEntityType,
        entity_id: i64,
        details: impl Into<String>,
    ) -> Self {
        Self {
            action,
            entity_type,
            entity_id,
            details: details.into(),
            user_id: actor.user_id,
            username: actor.username.clone(),
            ip_address: actor.ip_address.clone(),
        }
    }
}

/// Filters for listing audit entries; all present filters must match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditQuery {
    pub entity_type: Option<AuditEntityType>,
    pub action: Option<AuditAction>,
    pub entity_id: Option<i64>,
    pub user_id: Option<i64>,
    pub limit: i64,
    pub offset: i64,
}

impl AuditQuery {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 500;

    pub fn new() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            ..Self::default()
        }
    }

    /// Check an entry against the filters (ignores paging)
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        self.entity_type.map_or(true, |t| entry.entity_type == t)
            && self.action.map_or(true, |a| entry.action == a)
            && self.entity_id.map_or(true, |id| entry.entity_id == id)
            && self.user_id.map_or(true, |id| entry.user_id == id)
    }

    /// Clamp paging to sane values
    pub fn normalized(mut self) -> Self {
        if self.limit <= 0 {
            self.limit = Self::DEFAULT_LIMIT;
        }
        self.limit = self.limit.min(Self::MAX_LIMIT);
        self.offset = self.offset.max(0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(action: AuditAction, entity_type: AuditEntityType, entity_id: i64) -> AuditEntry {
        AuditEntry {
            id: 1,
            action,
            entity_type,
            entity_id,
            details: String::new(),
            user_id: 7,
            username: "admin".to_string(),
            ip_address: "127.0.0.1".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_entity_type_names() {
        assert_eq!(AuditEntityType::AccountGroup.as_str(), "account_group");
        assert_eq!(
            "account_group".parse::<AuditEntityType>().unwrap(),
            AuditEntityType::AccountGroup
        );
        assert_eq!(
            serde_json::to_string(&AuditEntityType::AccountGroup).unwrap(),
            "\"account_group\""
        );
        assert!("membership".parse::<AuditEntityType>().is_err());
    }

    #[test]
    fn test_action_parse() {
        assert_eq!("assign".parse::<AuditAction>().unwrap(), AuditAction::Assign);
        assert!("drop".parse::<AuditAction>().is_err());
    }

    #[test]
    fn test_query_matches_all_filters() {
        let e = entry(AuditAction::Create, AuditEntityType::Account, 3);

        assert!(AuditQuery::new().matches(&e));

        let q = AuditQuery {
            entity_type: Some(AuditEntityType::Account),
            entity_id: Some(3),
            ..AuditQuery::new()
        };
        assert!(q.matches(&e));

        let q = AuditQuery {
            entity_type: Some(AuditEntityType::Account),
            action: Some(AuditAction::Delete),
            ..AuditQuery::new()
        };
        assert!(!q.matches(&e));
    }

    #[test]
    fn test_query_normalized() {
        let q = AuditQuery {
            limit: 0,
            offset: -4,
            ..AuditQuery::default()
        }
        .normalized();
        assert_eq!(q.limit, AuditQuery::DEFAULT_LIMIT);
        assert_eq!(q.offset, 0);

        let q = AuditQuery {
            limit: 10_000,
            ..AuditQuery::default()
        }
        .normalized();
        assert_eq!(q.limit, AuditQuery::MAX_LIMIT);
    }

    #[test]
    fn test_new_entry_takes_actor() {
        let actor = Actor::new(9, "root", "10.0.0.1");
        let e = NewAuditEntry::new(
            &actor,
            AuditAction::Assign,
            AuditEntityType::AccountGroup,
            4,
            "Assigned",
        );
        assert_eq!(e.user_id, 9);
        assert_eq!(e.username, "root");
        assert_eq!(e.ip_address, "10.0.0.1");
    }
}
