//! Integration test utilities for the registry server
//!
//! This crate provides helpers for running end-to-end tests against
//! the REST API backed by a live PostgreSQL database.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
