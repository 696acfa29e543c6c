//! Identity type - classification shared by accounts and groups

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Classification of an account or group.
///
/// The type decides which numeric range its UID/GID is expected to fall in
/// and which group types an account may join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityType {
    People,
    System,
    Service,
    Database,
}

impl IdentityType {
    /// All identity types, in range order
    pub const ALL: [IdentityType; 4] = [
        IdentityType::System,
        IdentityType::People,
        IdentityType::Service,
        IdentityType::Database,
    ];

    /// Storage / wire representation
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::People => "people",
            Self::System => "system",
            Self::Service => "service",
            Self::Database => "database",
        }
    }

    /// Parse a type name, rejecting anything outside the known set
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "people" => Ok(Self::People),
            "system" => Ok(Self::System),
            "service" => Ok(Self::Service),
            "database" => Ok(Self::Database),
            _ => Err(DomainError::InvalidType(s.to_string())),
        }
    }

    #[inline]
    pub fn is_system(self) -> bool {
        self == Self::System
    }
}

impl fmt::Display for IdentityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentityType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IdentityType::parse(s)
    }
}

/// Which identifier space a number belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdKind {
    Uid,
    Gid,
}

impl IdKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Uid => "UID",
            Self::Gid => "GID",
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
