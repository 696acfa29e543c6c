//! Group entity - a UNIX group record

use chrono::{DateTime, Utc};

use crate::value_objects::IdentityType;

/// Group entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: i64,
    pub unix_gid: i64,
    pub groupname: String,
    pub group_type: IdentityType,
    pub description: String,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Group {
    pub fn new(unix_gid: i64, groupname: String, group_type: IdentityType) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            unix_gid,
            groupname,
            group_type,
            description: String::new(),
            created_by: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    #[inline]
    pub fn is_system(&self) -> bool {
        self.group_type.is_system()
    }
}

/// Fields the store needs to insert or overwrite a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDraft {
    pub unix_gid: i64,
    pub groupname: String,
    pub group_type: IdentityType,
    pub description: String,
    pub created_by: Option<String>,
}

impl From<&Group> for GroupDraft {
    fn from(group: &Group) -> Self {
        Self {
            unix_gid: group.unix_gid,
            groupname: group.groupname.clone(),
            group_type: group.group_type,
            description: group.description.clone(),
            created_by: group.created_by.clone(),
        }
    }
}
