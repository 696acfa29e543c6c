//! Group entity <-> model mapper

use unixify_core::entities::Group;
use unixify_core::error::DomainError;

use super::account::stored_type;
use crate::models::GroupModel;

/// Convert GroupModel to Group entity
impl TryFrom<GroupModel> for Group {
    type Error = DomainError;

    fn try_from(model: GroupModel) -> Result<Self, Self::Error> {
        Ok(Group {
            id: model.id,
            unix_gid: model.unix_gid,
            groupname: model.groupname,
            group_type: stored_type(&model.group_type)?,
            description: model.description,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        })
    }
}

pub fn groups_from_models(models: Vec<GroupModel>) -> Result<Vec<Group>, DomainError> {
    models.into_iter().map(Group::try_from).collect()
}
