use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{GroupId, OrganizationId, UserId};

/// An acting identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifier of the user
    pub id: UserId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Contact address, also used to assign documents to the user
    #[serde(default)]
    pub email: String,
    /// Groups the user is recorded in, per organization
    #[serde(default)]
    pub groups: BTreeMap<OrganizationId, BTreeSet<GroupId>>,
}

impl User {
    /// Create a user belonging to no groups
    pub fn new(id: impl Into<UserId>, email: impl Into<String>) -> Self {
        let email = email.into();
        Self {
            id: id.into(),
            name: email.clone(),
            email,
            groups: BTreeMap::new(),
        }
    }

    /// Record the user as a member of `group` in `organization`
    pub fn in_group(
        mut self,
        organization: impl Into<OrganizationId>,
        group: impl Into<GroupId>,
    ) -> Self {
        self.groups
            .entry(organization.into())
            .or_default()
            .insert(group.into());
        self
    }

    /// Groups recorded on the user for `organization`
    pub fn groups_in(&self, organization: &OrganizationId) -> impl Iterator<Item = &GroupId> {
        self.groups.get(organization).into_iter().flatten()
    }
}

/// A named set of users within an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Identifier of the group
    pub id: GroupId,
    /// The organization the group belongs to
    pub organization_id: OrganizationId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Members of the group
    #[serde(default)]
    pub users: BTreeSet<UserId>,
}

impl Group {
    /// Create an empty group in `organization`
    pub fn new(id: impl Into<GroupId>, organization: impl Into<OrganizationId>) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            organization_id: organization.into(),
            users: BTreeSet::new(),
        }
    }

    /// Add `user` to the members
    pub fn with_member(mut self, user: impl Into<UserId>) -> Self {
        self.users.insert(user.into());
        self
    }

    /// True if `user` is listed as a member
    pub fn has_member(&self, user: &UserId) -> bool {
        self.users.contains(user)
    }
}
