//! Group handlers
//!
//! Group CRUD, group members, and GID allocation helpers.

use axum::{extract::State, Json};
use unixify_service::{
    AccountResponse, Applied, CreateGroupRequest, DuplicateCheckResponse, GroupResponse,
    GroupService, IdentifierService, NextIdResponse, UpdateGroupRequest,
    ValidationOutcomeResponse,
};

use crate::extractors::{
    AuthUser, GidCheckParams, GidValidateParams, IdPath, ListParams, NamePath, QueryParams,
    TypeParams, ValidatedJson,
};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// List or search groups
///
/// GET /groups?type=&q=
pub async fn list_groups(
    State(state): State<AppState>,
    _auth: AuthUser,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Json<Vec<GroupResponse>>> {
    let service = GroupService::new(state.service_context());

    let groups = match params.search_term() {
        Some(q) => service.search_groups(q, params.identity_type.as_deref()).await?,
        None => service.list_groups(params.identity_type.as_deref()).await?,
    };

    Ok(Json(groups))
}

/// Create group
///
/// POST /groups
pub async fn create_group(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateGroupRequest>,
) -> ApiResult<Created<Json<Applied<GroupResponse>>>> {
    let service = GroupService::new(state.service_context());
    let response = service.create_group(request, &auth.actor()).await?;
    Ok(Created(Json(response)))
}

/// Get group by ID
///
/// GET /groups/{id}
pub async fn get_group(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(group_id): IdPath,
) -> ApiResult<Json<GroupResponse>> {
    let service = GroupService::new(state.service_context());
    let response = service.get_group(group_id).await?;
    Ok(Json(response))
}

/// Update group
///
/// PUT /groups/{id}
pub async fn update_group(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(group_id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateGroupRequest>,
) -> ApiResult<Json<Applied<GroupResponse>>> {
    let service = GroupService::new(state.service_context());
    let response = service.update_group(group_id, request, &auth.actor()).await?;
    Ok(Json(response))
}

/// Delete group
///
/// DELETE /groups/{id}
pub async fn delete_group(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(group_id): IdPath,
) -> ApiResult<NoContent> {
    let service = GroupService::new(state.service_context());
    service.delete_group(group_id, &auth.actor()).await?;
    Ok(NoContent)
}

/// Live group holding a GID
///
/// GET /groups/by-gid/{gid}
pub async fn get_group_by_gid(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(gid): IdPath,
) -> ApiResult<Json<GroupResponse>> {
    let service = GroupService::new(state.service_context());
    let response = service.get_group_by_gid(gid).await?;
    Ok(Json(response))
}

/// Live group with a groupname
///
/// GET /groups/by-name/{groupname}
pub async fn get_group_by_groupname(
    State(state): State<AppState>,
    _auth: AuthUser,
    NamePath(groupname): NamePath,
) -> ApiResult<Json<GroupResponse>> {
    let service = GroupService::new(state.service_context());
    let response = service.get_group_by_groupname(&groupname).await?;
    Ok(Json(response))
}

/// Accounts in the group
///
/// GET /groups/{id}/members
pub async fn get_group_members(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(group_id): IdPath,
) -> ApiResult<Json<Vec<AccountResponse>>> {
    let service = GroupService::new(state.service_context());
    let members = service.get_group_members(group_id).await?;
    Ok(Json(members))
}

/// Next free GID for a type
///
/// GET /groups/next-gid?type=
pub async fn next_gid(
    State(state): State<AppState>,
    _auth: AuthUser,
    QueryParams(params): QueryParams<TypeParams>,
) -> ApiResult<Json<NextIdResponse>> {
    let service = IdentifierService::new(state.service_context());
    let response = service.next_available_gid(&params.identity_type).await?;
    Ok(Json(response))
}

/// Whether another live group already holds a GID
///
/// GET /groups/gid-check?gid=&exclude_id=
pub async fn gid_check(
    State(state): State<AppState>,
    _auth: AuthUser,
    QueryParams(params): QueryParams<GidCheckParams>,
) -> ApiResult<Json<DuplicateCheckResponse>> {
    let service = IdentifierService::new(state.service_context());
    let response = service.is_gid_duplicate(params.gid, params.exclude_id).await?;
    Ok(Json(response))
}

/// Check a GID against the range policy
///
/// GET /groups/gid-validate?gid=&type=
pub async fn gid_validate(
    State(state): State<AppState>,
    _auth: AuthUser,
    QueryParams(params): QueryParams<GidValidateParams>,
) -> Json<ValidationOutcomeResponse> {
    let service = IdentifierService::new(state.service_context());
    let outcome = service.validate_gid(params.gid, &params.identity_type);
    Json(ValidationOutcomeResponse::from(outcome))
}
