use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use gatehouse_model::{
    Collection, CollectionId, Group, GroupId, LinkType, LinkTypeId, OrganizationId, User, UserId,
    View, ViewId,
};
use parking_lot::RwLock;

use crate::GatehousePermissionsError;

use super::Directory;

#[derive(Default)]
struct Entries {
    users: HashMap<UserId, User>,
    members: HashMap<OrganizationId, BTreeSet<UserId>>,
    groups: HashMap<OrganizationId, HashMap<GroupId, Group>>,
    views: HashMap<ViewId, View>,
    collections: HashMap<CollectionId, Collection>,
    link_types: HashMap<LinkTypeId, LinkType>,
}

/// A [Directory] whose entities are all held in memory. Clones share the
/// same entries, so a test can keep a handle and mutate the directory while
/// a gate reads from it.
///
/// A user counts as a member of every organization their group memberships
/// name, and of any organization they are explicitly added to.
#[derive(Clone, Default)]
pub struct MemoryDirectory {
    entries: Arc<RwLock<Entries>>,
}

impl MemoryDirectory {
    /// Store (or replace) a user
    pub fn insert_user(&self, user: User) {
        let mut entries = self.entries.write();
        for organization in user.groups.keys() {
            entries
                .members
                .entry(organization.clone())
                .or_default()
                .insert(user.id.clone());
        }
        entries.users.insert(user.id.clone(), user);
    }

    /// Make `user` a member of `organization`
    pub fn add_to_organization(&self, organization: &OrganizationId, user: &UserId) {
        self.entries
            .write()
            .members
            .entry(organization.clone())
            .or_default()
            .insert(user.clone());
    }

    /// Store (or replace) a group under its organization
    pub fn insert_group(&self, group: Group) {
        let mut entries = self.entries.write();
        for member in &group.users {
            entries
                .members
                .entry(group.organization_id.clone())
                .or_default()
                .insert(member.clone());
        }
        entries
            .groups
            .entry(group.organization_id.clone())
            .or_default()
            .insert(group.id.clone(), group);
    }

    /// Store (or replace) a view
    pub fn insert_view(&self, view: View) {
        self.entries.write().views.insert(view.id.clone(), view);
    }

    /// Store (or replace) a collection
    pub fn insert_collection(&self, collection: Collection) {
        self.entries
            .write()
            .collections
            .insert(collection.id.clone(), collection);
    }

    /// Store (or replace) a link type
    pub fn insert_link_type(&self, link_type: LinkType) {
        self.entries
            .write()
            .link_types
            .insert(link_type.id.clone(), link_type);
    }

    /// Builder form of [MemoryDirectory::insert_user]
    pub fn with_user(self, user: User) -> Self {
        self.insert_user(user);
        self
    }

    /// Builder form of [MemoryDirectory::insert_group]
    pub fn with_group(self, group: Group) -> Self {
        self.insert_group(group);
        self
    }

    /// Builder form of [MemoryDirectory::insert_view]
    pub fn with_view(self, view: View) -> Self {
        self.insert_view(view);
        self
    }

    /// Builder form of [MemoryDirectory::insert_collection]
    pub fn with_collection(self, collection: Collection) -> Self {
        self.insert_collection(collection);
        self
    }

    /// Builder form of [MemoryDirectory::insert_link_type]
    pub fn with_link_type(self, link_type: LinkType) -> Self {
        self.insert_link_type(link_type);
        self
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Directory for MemoryDirectory {
    type Error = GatehousePermissionsError;

    async fn user(&self, id: &UserId) -> Result<Option<User>, Self::Error> {
        Ok(self.entries.read().users.get(id).cloned())
    }

    async fn users(&self, organization: &OrganizationId) -> Result<Vec<User>, Self::Error> {
        let entries = self.entries.read();
        Ok(entries
            .members
            .get(organization)
            .into_iter()
            .flatten()
            .filter_map(|id| entries.users.get(id).cloned())
            .collect())
    }

    async fn groups(&self, organization: &OrganizationId) -> Result<Vec<Group>, Self::Error> {
        Ok(self
            .entries
            .read()
            .groups
            .get(organization)
            .map(|groups| groups.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn view(&self, id: &ViewId) -> Result<Option<View>, Self::Error> {
        Ok(self.entries.read().views.get(id).cloned())
    }

    async fn collection(&self, id: &CollectionId) -> Result<Option<Collection>, Self::Error> {
        Ok(self.entries.read().collections.get(id).cloned())
    }

    async fn link_types(&self) -> Result<Vec<LinkType>, Self::Error> {
        Ok(self.entries.read().link_types.values().cloned().collect())
    }
}
