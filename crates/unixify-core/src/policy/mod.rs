//! Identifier policy: ranges, validation, allocation and membership rules

mod allocator;
mod compatibility;
mod range;
mod validator;

pub use allocator::IdAllocator;
pub use compatibility::is_compatible;
pub use range::{IdRange, RangePolicy, RangeTable};
pub use validator::{IdOutcome, IdValidator, InvalidReason, RangeWarning};
