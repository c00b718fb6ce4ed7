use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::UserId;

/// How the set of users holding some role changed between two versions of a
/// resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolesDifference {
    /// Users holding the role only in the newer version
    pub added_users: BTreeSet<UserId>,
    /// Users holding the role only in the older version
    pub removed_users: BTreeSet<UserId>,
}

impl RolesDifference {
    /// Compare the holders of a role before (`old`) and after (`new`) a change
    pub fn between(old: &BTreeSet<UserId>, new: &BTreeSet<UserId>) -> Self {
        Self {
            added_users: new.difference(old).cloned().collect(),
            removed_users: old.difference(new).cloned().collect(),
        }
    }

    /// True if nobody gained or lost the role
    pub fn is_empty(&self) -> bool {
        self.added_users.is_empty() && self.removed_users.is_empty()
    }
}
