//! Account handlers
//!
//! Account CRUD, the account's groups, and UID allocation helpers.

use axum::{extract::State, Json};
use unixify_service::{
    AccountResponse, AccountService, Applied, CreateAccountRequest, DuplicateCheckResponse,
    GroupResponse, IdentifierService, NextIdResponse, UpdateAccountRequest,
    ValidationOutcomeResponse,
};

use crate::extractors::{
    AuthUser, IdPath, ListParams, NamePath, QueryParams, TypeParams, UidCheckParams,
    UidValidateParams, ValidatedJson,
};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// List or search accounts
///
/// GET /accounts?type=&q=
pub async fn list_accounts(
    State(state): State<AppState>,
    _auth: AuthUser,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Json<Vec<AccountResponse>>> {
    let service = AccountService::new(state.service_context());

    let accounts = match params.search_term() {
        Some(q) => service.search_accounts(q, params.identity_type.as_deref()).await?,
        None => service.list_accounts(params.identity_type.as_deref()).await?,
    };

    Ok(Json(accounts))
}

/// Create account
///
/// POST /accounts
pub async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateAccountRequest>,
) -> ApiResult<Created<Json<Applied<AccountResponse>>>> {
    let service = AccountService::new(state.service_context());
    let response = service.create_account(request, &auth.actor()).await?;
    Ok(Created(Json(response)))
}

/// Get account by ID
///
/// GET /accounts/{id}
pub async fn get_account(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(account_id): IdPath,
) -> ApiResult<Json<AccountResponse>> {
    let service = AccountService::new(state.service_context());
    let response = service.get_account(account_id).await?;
    Ok(Json(response))
}

/// Update account
///
/// PUT /accounts/{id}
pub async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(account_id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateAccountRequest>,
) -> ApiResult<Json<Applied<AccountResponse>>> {
    let service = AccountService::new(state.service_context());
    let response = service
        .update_account(account_id, request, &auth.actor())
        .await?;
    Ok(Json(response))
}

/// Delete account
///
/// DELETE /accounts/{id}
pub async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(account_id): IdPath,
) -> ApiResult<NoContent> {
    let service = AccountService::new(state.service_context());
    service.delete_account(account_id, &auth.actor()).await?;
    Ok(NoContent)
}

/// Live account holding a UID
///
/// GET /accounts/by-uid/{uid}
pub async fn get_account_by_uid(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(uid): IdPath,
) -> ApiResult<Json<AccountResponse>> {
    let service = AccountService::new(state.service_context());
    let response = service.get_account_by_uid(uid).await?;
    Ok(Json(response))
}

/// Live account with a username
///
/// GET /accounts/by-name/{username}
pub async fn get_account_by_username(
    State(state): State<AppState>,
    _auth: AuthUser,
    NamePath(username): NamePath,
) -> ApiResult<Json<AccountResponse>> {
    let service = AccountService::new(state.service_context());
    let response = service.get_account_by_username(&username).await?;
    Ok(Json(response))
}

/// Groups the account belongs to
///
/// GET /accounts/{id}/groups
pub async fn get_account_groups(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(account_id): IdPath,
) -> ApiResult<Json<Vec<GroupResponse>>> {
    let service = AccountService::new(state.service_context());
    let groups = service.get_account_groups(account_id).await?;
    Ok(Json(groups))
}

/// Next free UID for a type
///
/// GET /accounts/next-uid?type=
pub async fn next_uid(
    State(state): State<AppState>,
    _auth: AuthUser,
    QueryParams(params): QueryParams<TypeParams>,
) -> ApiResult<Json<NextIdResponse>> {
    let service = IdentifierService::new(state.service_context());
    let response = service.next_available_uid(&params.identity_type).await?;
    Ok(Json(response))
}

/// Whether another live account already holds a UID
///
/// GET /accounts/uid-check?uid=&exclude_id=
pub async fn uid_check(
    State(state): State<AppState>,
    _auth: AuthUser,
    QueryParams(params): QueryParams<UidCheckParams>,
) -> ApiResult<Json<DuplicateCheckResponse>> {
    let service = IdentifierService::new(state.service_context());
    let response = service.is_uid_duplicate(params.uid, params.exclude_id).await?;
    Ok(Json(response))
}

/// Check a UID against the range policy
///
/// GET /accounts/uid-validate?uid=&type=
pub async fn uid_validate(
    State(state): State<AppState>,
    _auth: AuthUser,
    QueryParams(params): QueryParams<UidValidateParams>,
) -> Json<ValidationOutcomeResponse> {
    let service = IdentifierService::new(state.service_context());
    let outcome = service.validate_uid(params.uid, &params.identity_type);
    Json(ValidationOutcomeResponse::from(outcome))
}
