//! Range policy - recommended identifier ranges per identity type

use serde::Serialize;
use std::fmt;

use crate::error::DomainError;
use crate::value_objects::{IdKind, IdentityType};

/// Inclusive numeric range `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdRange {
    pub min: i64,
    pub max: i64,
}

impl IdRange {
    #[must_use]
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub const fn contains(&self, id: i64) -> bool {
        id >= self.min && id <= self.max
    }
}

impl fmt::Display for IdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.min, self.max)
    }
}

/// Ranges for each identity type, in `IdentityType::ALL` order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeTable {
    pub system: IdRange,
    pub people: IdRange,
    pub service: IdRange,
    pub database: IdRange,
}

impl RangeTable {
    /// The stock table shared by UIDs and GIDs
    pub const STANDARD: RangeTable = RangeTable {
        system: IdRange::new(1, 999),
        people: IdRange::new(1000, 60000),
        service: IdRange::new(60001, 65535),
        database: IdRange::new(70000, 79999),
    };

    #[inline]
    pub const fn get(&self, ty: IdentityType) -> IdRange {
        match ty {
            IdentityType::System => self.system,
            IdentityType::People => self.people,
            IdentityType::Service => self.service,
            IdentityType::Database => self.database,
        }
    }
}

/// Immutable mapping from (identifier kind, identity type) to its
/// recommended range. Built once and shared by the validator and allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangePolicy {
    uid: RangeTable,
    gid: RangeTable,
}

impl RangePolicy {
    pub const fn new(uid: RangeTable, gid: RangeTable) -> Self {
        Self { uid, gid }
    }

    /// Recommended range for a type
    pub const fn range_for(&self, kind: IdKind, ty: IdentityType) -> IdRange {
        match kind {
            IdKind::Uid => self.uid.get(ty),
            IdKind::Gid => self.gid.get(ty),
        }
    }

    /// Recommended range for a type given by name
    pub fn range_for_name(&self, kind: IdKind, type_name: &str) -> Result<IdRange, DomainError> {
        let ty = IdentityType::parse(type_name)?;
        Ok(self.range_for(kind, ty))
    }
}

impl Default for RangePolicy {
    fn default() -> Self {
        Self::new(RangeTable::STANDARD, RangeTable::STANDARD)
    }
}
