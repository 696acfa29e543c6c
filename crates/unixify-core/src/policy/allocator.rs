//! Next-identifier proposal

use super::range::RangePolicy;
use crate::value_objects::{IdKind, IdentityType};

/// Proposes the next identifier for a type from the current maximum.
///
/// The proposal is advisory: two callers can observe the same maximum,
/// so every insert still goes through the uniqueness check.
#[derive(Debug, Clone, Copy)]
pub struct IdAllocator<'a> {
    policy: &'a RangePolicy,
    kind: IdKind,
}

impl<'a> IdAllocator<'a> {
    pub fn new(policy: &'a RangePolicy, kind: IdKind) -> Self {
        Self { policy, kind }
    }

    /// `max + 1` when the type already has identifiers, else the range minimum
    pub fn next_after(&self, max: Option<i64>, ty: IdentityType) -> i64 {
        match max {
            Some(max) => max.saturating_add(1),
            None => self.policy.range_for(self.kind, ty).min,
        }
    }
}
