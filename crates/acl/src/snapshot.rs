//! Serializable views of a decoded ACL, used for JSON listings and backups.

use serde::Serialize;

use crate::entry::Principal;
use crate::model::{AclModel, AclSet};
use crate::perms::AclPerms;

/// A serializable view of an [`AclModel`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AclSnapshot {
    /// Target path.
    pub path: String,
    /// `f` for files, `d` for directories.
    #[serde(rename = "type")]
    pub object_type: &'static str,
    /// Owner from the `#owner:` line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Group from the `#group:` line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// The access collection.
    pub access: CollectionSnapshot,
    /// The default collection, when loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<CollectionSnapshot>,
}

/// A serializable view of one ACL collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CollectionSnapshot {
    /// `user::` permissions.
    pub user_perms: Option<AclPerms>,
    /// `group::` permissions.
    pub group_perms: Option<AclPerms>,
    /// `other::` permissions.
    pub other_perms: Option<AclPerms>,
    /// Effective mask.
    pub mask: Option<AclPerms>,
    /// Named users in emission order.
    pub users: Vec<NamedSnapshot>,
    /// Named groups in emission order.
    pub groups: Vec<NamedSnapshot>,
}

/// A named user or group with its granted and effective permissions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NamedSnapshot {
    /// User or group name.
    pub name: String,
    /// Granted permissions.
    pub perms: AclPerms,
    /// Permissions after masking.
    pub effective: AclPerms,
}

impl AclModel {
    /// Captures the model for serialization.
    #[must_use]
    pub fn snapshot(&self) -> AclSnapshot {
        AclSnapshot {
            path: self.target().path().display().to_string(),
            object_type: self.target().kind().code(),
            owner: self.owner_name().map(str::to_owned),
            group: self.group_name().map(str::to_owned),
            access: CollectionSnapshot::from(self.access()),
            default: self.default_acl().map(CollectionSnapshot::from),
        }
    }
}

impl From<&AclSet> for CollectionSnapshot {
    fn from(set: &AclSet) -> Self {
        let mask = set.mask();
        let mut users = Vec::new();
        let mut groups = Vec::new();
        for entry in set.named() {
            let named = NamedSnapshot {
                name: entry.principal().name().to_owned(),
                perms: entry.perms(),
                effective: entry.perms().intersect(mask.unwrap_or(AclPerms::ALL)),
            };
            match entry.principal() {
                Principal::User(_) => users.push(named),
                Principal::Group(_) => groups.push(named),
            }
        }

        Self {
            user_perms: set.owner(),
            group_perms: set.owning_group(),
            other_perms: set.other(),
            mask,
            users,
            groups,
        }
    }
}
