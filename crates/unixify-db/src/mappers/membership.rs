//! Membership entity <-> model mapper

use unixify_core::entities::Membership;

use crate::models::MembershipModel;

impl From<MembershipModel> for Membership {
    fn from(model: MembershipModel) -> Self {
        Membership {
            account_id: model.account_id,
            group_id: model.group_id,
            created_at: model.created_at,
        }
    }
}
