//! Route handlers
//!
//! All HTTP request handlers organized by resource.

pub mod accounts;
pub mod audit;
pub mod groups;
pub mod health;
pub mod memberships;
