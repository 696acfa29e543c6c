//! Actor - who performed a mutation, for audit attribution

use serde::{Deserialize, Serialize};

/// The operator behind a mutating request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: i64,
    pub username: String,
    pub ip_address: String,
}

impl Actor {
    pub fn new(user_id: i64, username: impl Into<String>, ip_address: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            ip_address: ip_address.into(),
        }
    }
}
