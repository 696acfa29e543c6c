//! Membership handlers

use axum::extract::State;
use unixify_service::{MembershipRequest, MembershipService};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Assign an account to a group
///
/// POST /memberships
pub async fn assign(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<MembershipRequest>,
) -> ApiResult<NoContent> {
    let service = MembershipService::new(state.service_context());
    service
        .assign_account_to_group(request.account_id, request.group_id, &auth.actor())
        .await?;
    Ok(NoContent)
}

/// Remove an account from a group
///
/// DELETE /memberships
pub async fn remove(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<MembershipRequest>,
) -> ApiResult<NoContent> {
    let service = MembershipService::new(state.service_context());
    service
        .remove_account_from_group(request.account_id, request.group_id, &auth.actor())
        .await?;
    Ok(NoContent)
}
