//! Route definitions
//!
//! All API routes organized by resource and mounted under /api/v1.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{accounts, audit, groups, health, memberships};
use crate::state::AppState;

/// Create the main API router (health is exported separately to bypass rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(account_routes())
        .merge(group_routes())
        .merge(membership_routes())
        .merge(audit_routes())
}

/// Account routes
fn account_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/accounts",
            get(accounts::list_accounts).post(accounts::create_account),
        )
        .route("/accounts/next-uid", get(accounts::next_uid))
        .route("/accounts/uid-check", get(accounts::uid_check))
        .route("/accounts/uid-validate", get(accounts::uid_validate))
        .route("/accounts/by-uid/:uid", get(accounts::get_account_by_uid))
        .route("/accounts/by-name/:username", get(accounts::get_account_by_username))
        .route(
            "/accounts/:id",
            get(accounts::get_account)
                .put(accounts::update_account)
                .delete(accounts::delete_account),
        )
        .route("/accounts/:id/groups", get(accounts::get_account_groups))
}

/// Group routes
fn group_routes() -> Router<AppState> {
    Router::new()
        .route("/groups", get(groups::list_groups).post(groups::create_group))
        .route("/groups/next-gid", get(groups::next_gid))
        .route("/groups/gid-check", get(groups::gid_check))
        .route("/groups/gid-validate", get(groups::gid_validate))
        .route("/groups/by-gid/:gid", get(groups::get_group_by_gid))
        .route("/groups/by-name/:groupname", get(groups::get_group_by_groupname))
        .route(
            "/groups/:id",
            get(groups::get_group)
                .put(groups::update_group)
                .delete(groups::delete_group),
        )
        .route("/groups/:id/members", get(groups::get_group_members))
}

/// Membership routes
fn membership_routes() -> Router<AppState> {
    Router::new().route(
        "/memberships",
        post(memberships::assign).delete(memberships::remove),
    )
}

/// Audit log routes
fn audit_routes() -> Router<AppState> {
    Router::new()
        .route("/audit", get(audit::list_entries))
        .route("/audit/:id", get(audit::get_entry))
}
