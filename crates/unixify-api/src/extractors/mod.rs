//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, path ids and query strings.

mod auth;
mod path;
mod query;
mod validated;

pub use auth::AuthUser;
pub use path::{IdPath, NamePath};
pub use query::{
    AuditFilter, AuditLogParams, GidCheckParams, GidValidateParams, ListParams, QueryParams,
    TypeParams, UidCheckParams, UidValidateParams,
};
pub use validated::ValidatedJson;
