//! Audit log handlers

use axum::{extract::State, Json};
use unixify_service::{AuditEntryResponse, AuditService};

use crate::extractors::{AuditFilter, AuthUser, IdPath};
use crate::response::ApiResult;
use crate::state::AppState;

/// Audit entries, newest first
///
/// GET /audit?entity_type=&action=&entity_id=&user_id=&limit=&offset=
pub async fn list_entries(
    State(state): State<AppState>,
    _auth: AuthUser,
    AuditFilter(query): AuditFilter,
) -> ApiResult<Json<Vec<AuditEntryResponse>>> {
    let service = AuditService::new(state.service_context());
    let entries = service.list_entries(query).await?;
    Ok(Json(entries))
}

/// Get one audit entry
///
/// GET /audit/{id}
pub async fn get_entry(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(entry_id): IdPath,
) -> ApiResult<Json<AuditEntryResponse>> {
    let service = AuditService::new(state.service_context());
    let entry = service.get_entry(entry_id).await?;
    Ok(Json(entry))
}
