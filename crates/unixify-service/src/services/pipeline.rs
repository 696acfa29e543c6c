//! Audited write unit shared by every mutating service
//!
//! A mutation and its audit entry live in one store transaction. The
//! transaction is rolled back when [`AuditedWrite`] is dropped before
//! [`AuditedWrite::finish`] succeeds.

use tracing::warn;

use unixify_core::entities::NewAuditEntry;
use unixify_core::error::DomainError;
use unixify_core::traits::RegistryTransaction;
use unixify_core::RangeWarning;

use super::context::ServiceContext;
use super::error::ServiceResult;

pub(crate) struct AuditedWrite {
    tx: Box<dyn RegistryTransaction>,
}

impl AuditedWrite {
    pub(crate) async fn begin(ctx: &ServiceContext) -> ServiceResult<Self> {
        let tx = ctx.store().begin().await?;
        Ok(Self { tx })
    }

    pub(crate) fn tx(&mut self) -> &mut dyn RegistryTransaction {
        self.tx.as_mut()
    }

    /// Append the audit entry and commit
    ///
    /// Any failure while appending is reported as `AuditWriteFailed`; the
    /// mutation is discarded with the transaction.
    pub(crate) async fn finish(mut self, entry: NewAuditEntry) -> ServiceResult<()> {
        self.tx
            .append_audit(&entry)
            .await
            .map_err(|e| match e {
                DomainError::AuditWriteFailed(_) => e,
                other => DomainError::AuditWriteFailed(other.to_string()),
            })?;
        self.tx.commit().await?;
        Ok(())
    }
}

pub(crate) fn log_warnings(warnings: &[RangeWarning]) {
    for w in warnings {
        warn!(
            kind = %w.kind,
            id = w.id,
            identity_type = %w.identity_type,
            range = %w.range,
            "Identifier outside recommended range"
        );
    }
}
