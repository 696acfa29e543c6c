//! Value objects - immutable types that represent domain concepts

mod actor;
mod identity_type;

pub use actor::Actor;
pub use identity_type::{IdKind, IdentityType};
