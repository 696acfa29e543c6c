//! Identifier validation against the range policy

use serde::Serialize;
use std::fmt;

use super::range::{IdRange, RangePolicy};
use crate::error::DomainError;
use crate::value_objects::{IdKind, IdentityType};

/// Non-blocking notice that an identifier sits outside its recommended range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeWarning {
    pub kind: IdKind,
    pub id: i64,
    pub identity_type: IdentityType,
    pub range: IdRange,
}

impl RangeWarning {
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "identifier {} outside recommended range {} for type {}",
            self.id, self.range, self.identity_type
        )
    }
}

/// Why an identifier was rejected outright
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    Negative,
    UnknownType(String),
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negative => f.write_str("identifier cannot be negative"),
            Self::UnknownType(_) => f.write_str("invalid type"),
        }
    }
}

/// Result of validating one identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdOutcome {
    Ok,
    Warning(RangeWarning),
    Invalid(InvalidReason),
}

impl IdOutcome {
    #[inline]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    #[inline]
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Warning(_))
    }

    #[inline]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// Human-readable message, `None` when the identifier is fine
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Ok => None,
            Self::Warning(w) => Some(w.to_string()),
            Self::Invalid(reason) => Some(reason.to_string()),
        }
    }

    /// Only `Invalid` blocks; a warning is handed back to the caller.
    pub fn into_result(self, kind: IdKind) -> Result<Option<RangeWarning>, DomainError> {
        match self {
            Self::Ok => Ok(None),
            Self::Warning(w) => Ok(Some(w)),
            Self::Invalid(InvalidReason::Negative) => Err(DomainError::NegativeIdentifier(kind)),
            Self::Invalid(InvalidReason::UnknownType(name)) => {
                Err(DomainError::InvalidType(name))
            }
        }
    }
}

/// Classifies UIDs and GIDs against a [`RangePolicy`]
#[derive(Debug, Clone, Copy)]
pub struct IdValidator<'a> {
    policy: &'a RangePolicy,
    kind: IdKind,
}

impl<'a> IdValidator<'a> {
    pub fn new(policy: &'a RangePolicy, kind: IdKind) -> Self {
        Self { policy, kind }
    }

    pub fn kind(&self) -> IdKind {
        self.kind
    }

    pub fn validate(&self, id: i64, ty: IdentityType) -> IdOutcome {
        if id < 0 {
            return IdOutcome::Invalid(InvalidReason::Negative);
        }

        let range = self.policy.range_for(self.kind, ty);
        if range.contains(id) {
            IdOutcome::Ok
        } else {
            IdOutcome::Warning(RangeWarning {
                kind: self.kind,
                id,
                identity_type: ty,
                range,
            })
        }
    }

    /// Same as [`validate`](Self::validate) but for a type taken from user input
    pub fn validate_named(&self, id: i64, type_name: &str) -> IdOutcome {
        if id < 0 {
            return IdOutcome::Invalid(InvalidReason::Negative);
        }
        match IdentityType::parse(type_name) {
            Ok(ty) => self.validate(id, ty),
            Err(_) => IdOutcome::Invalid(InvalidReason::UnknownType(type_name.to_string())),
        }
    }
}
