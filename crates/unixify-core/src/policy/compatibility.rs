//! Which account types may join which group types

use crate::value_objects::IdentityType;

/// Membership compatibility rule.
///
/// people may join people and database groups; every other type may only
/// join groups of its own type.
pub const fn is_compatible(account_type: IdentityType, group_type: IdentityType) -> bool {
    use IdentityType::{Database, People, Service, System};

    matches!(
        (account_type, group_type),
        (People, People | Database)
            | (System, System)
            | (Database, Database)
            | (Service, Service)
    )
}
