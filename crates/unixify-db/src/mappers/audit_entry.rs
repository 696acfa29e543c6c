//! Audit entry entity <-> model mapper

use unixify_core::entities::{AuditAction, AuditEntityType, AuditEntry};
use unixify_core::error::DomainError;

use crate::models::AuditEntryModel;

/// Convert AuditEntryModel to AuditEntry entity
impl TryFrom<AuditEntryModel> for AuditEntry {
    type Error = DomainError;

    fn try_from(model: AuditEntryModel) -> Result<Self, Self::Error> {
        let action: AuditAction = model
            .action
            .parse()
            .map_err(|e: DomainError| DomainError::DatabaseError(e.to_string()))?;
        let entity_type: AuditEntityType = model
            .entity_type
            .parse()
            .map_err(|e: DomainError| DomainError::DatabaseError(e.to_string()))?;

        Ok(AuditEntry {
            id: model.id,
            action,
            entity_type,
            entity_id: model.entity_id,
            details: model.details,
            user_id: model.user_id,
            username: model.username,
            ip_address: model.ip_address,
            timestamp: model.occurred_at,
        })
    }
}
