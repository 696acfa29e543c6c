//! Account entity <-> model mapper

use unixify_core::entities::Account;
use unixify_core::error::DomainError;
use unixify_core::value_objects::IdentityType;

use crate::models::AccountModel;

/// Convert AccountModel to Account entity
impl TryFrom<AccountModel> for Account {
    type Error = DomainError;

    fn try_from(model: AccountModel) -> Result<Self, Self::Error> {
        Ok(Account {
            id: model.id,
            unix_uid: model.unix_uid,
            username: model.username,
            account_type: stored_type(&model.account_type)?,
            primary_group_id: model.primary_group_id,
            first_name: model.first_name,
            last_name: model.last_name,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        })
    }
}

/// Parse an identity type read back from storage
pub(crate) fn stored_type(raw: &str) -> Result<IdentityType, DomainError> {
    IdentityType::parse(raw)
        .map_err(|_| DomainError::DatabaseError(format!("unexpected identity type in row: {raw}")))
}

/// Convert a batch of rows, failing on the first bad one
pub fn accounts_from_models(models: Vec<AccountModel>) -> Result<Vec<Account>, DomainError> {
    models.into_iter().map(Account::try_from).collect()
}
