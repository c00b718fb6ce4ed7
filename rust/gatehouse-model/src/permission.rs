use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{GroupId, Role, UserId};

/// The explicit grants of a resource: [`Role`]s granted to individual users
/// and [`Role`]s granted to groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    /// Grants keyed by the user they were made to
    #[serde(default)]
    pub users: BTreeMap<UserId, BTreeSet<Role>>,
    /// Grants keyed by the group they were made to
    #[serde(default)]
    pub groups: BTreeMap<GroupId, BTreeSet<Role>>,
}

impl Permissions {
    /// Grant `roles` to `user`, keeping any roles already granted
    pub fn with_user<I, R>(mut self, user: &UserId, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        self.grant_user(user, roles);
        self
    }

    /// Grant `roles` to `group`, keeping any roles already granted
    pub fn with_group<I, R>(mut self, group: &GroupId, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        self.grant_group(group, roles);
        self
    }

    /// Grant `roles` to `user` in place
    pub fn grant_user<I, R>(&mut self, user: &UserId, roles: I)
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        self.users
            .entry(user.clone())
            .or_default()
            .extend(roles.into_iter().map(Into::into));
    }

    /// Grant `roles` to `group` in place
    pub fn grant_group<I, R>(&mut self, group: &GroupId, roles: I)
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        self.groups
            .entry(group.clone())
            .or_default()
            .extend(roles.into_iter().map(Into::into));
    }

    /// Remove every grant made to `user`
    pub fn revoke_user(&mut self, user: &UserId) {
        self.users.remove(user);
    }

    /// True if `user` has been granted anything directly
    pub fn has_user_grants(&self, user: &UserId) -> bool {
        self.users.get(user).is_some_and(|roles| !roles.is_empty())
    }

    /// The [`Role`]s granted directly to `user` plus the [`Role`]s granted to
    /// any of `groups`.
    pub fn roles_of(&self, user: &UserId, groups: &BTreeSet<GroupId>) -> BTreeSet<Role> {
        let direct = self.users.get(user).into_iter().flatten();
        let inherited = groups
            .iter()
            .filter_map(|group| self.groups.get(group))
            .flatten();

        direct.chain(inherited).copied().collect()
    }
}
