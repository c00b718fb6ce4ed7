use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use gatehouse_model::{
    Collection, CollectionId, Group, GroupId, LinkType, Organization, OrganizationId, Query, User,
    UserId, View, ViewId,
};
use tokio::sync::OnceCell;

use crate::{Directory, EntityKind, GatehousePermissionsError, group_membership};

fn lift<T, E>(result: Result<T, E>) -> Result<T, GatehousePermissionsError>
where
    E: Into<GatehousePermissionsError>,
{
    result.map_err(Into::into)
}

/// [Lookup] reads entities from a [Directory] on behalf of one session and
/// memoizes them, so that a burst of permission checks fetches each user,
/// view, collection and group list at most once.
///
/// Entities are snapshots: a change in the directory is not seen by a
/// [Lookup] that already holds the entity.
pub struct Lookup<D>
where
    D: Directory,
{
    directory: D,
    users: HashMap<UserId, Arc<User>>,
    members: HashMap<OrganizationId, Arc<Vec<User>>>,
    groups: HashMap<OrganizationId, Arc<Vec<Group>>>,
    views: HashMap<ViewId, Arc<View>>,
    collections: HashMap<CollectionId, Arc<Collection>>,
    link_types: OnceCell<Arc<Vec<LinkType>>>,
}

impl<D> Lookup<D>
where
    D: Directory,
{
    /// Start a session over `directory`
    pub fn new(directory: D) -> Self {
        Self {
            directory,
            users: HashMap::new(),
            members: HashMap::new(),
            groups: HashMap::new(),
            views: HashMap::new(),
            collections: HashMap::new(),
            link_types: OnceCell::new(),
        }
    }

    /// The underlying directory
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// The user with the given id
    pub async fn user(&mut self, id: &UserId) -> Result<Arc<User>, GatehousePermissionsError> {
        if let Some(user) = self.users.get(id) {
            return Ok(user.clone());
        }
        let user = lift(self.directory.user(id).await)?
            .map(Arc::new)
            .ok_or_else(|| GatehousePermissionsError::not_found(EntityKind::User, id))?;
        self.users.insert(id.clone(), user.clone());
        Ok(user)
    }

    /// Every user of an organization
    pub async fn users(
        &mut self,
        organization: &OrganizationId,
    ) -> Result<Arc<Vec<User>>, GatehousePermissionsError> {
        if let Some(users) = self.members.get(organization) {
            return Ok(users.clone());
        }
        let users = Arc::new(lift(self.directory.users(organization).await)?);
        self.members.insert(organization.clone(), users.clone());
        Ok(users)
    }

    /// Every group of an organization
    pub async fn groups(
        &mut self,
        organization: &OrganizationId,
    ) -> Result<Arc<Vec<Group>>, GatehousePermissionsError> {
        if let Some(groups) = self.groups.get(organization) {
            return Ok(groups.clone());
        }
        let groups = Arc::new(lift(self.directory.groups(organization).await)?);
        self.groups.insert(organization.clone(), groups.clone());
        Ok(groups)
    }

    /// The view with the given id
    pub async fn view(&mut self, id: &ViewId) -> Result<Arc<View>, GatehousePermissionsError> {
        if let Some(view) = self.views.get(id) {
            return Ok(view.clone());
        }
        let view = lift(self.directory.view(id).await)?
            .map(Arc::new)
            .ok_or_else(|| GatehousePermissionsError::not_found(EntityKind::View, id))?;
        self.views.insert(id.clone(), view.clone());
        Ok(view)
    }

    /// The collection with the given id
    pub async fn collection(
        &mut self,
        id: &CollectionId,
    ) -> Result<Arc<Collection>, GatehousePermissionsError> {
        if let Some(collection) = self.collections.get(id) {
            return Ok(collection.clone());
        }
        let collection = lift(self.directory.collection(id).await)?
            .map(Arc::new)
            .ok_or_else(|| GatehousePermissionsError::not_found(EntityKind::Collection, id))?;
        self.collections.insert(id.clone(), collection.clone());
        Ok(collection)
    }

    /// Every link type, read once per session
    pub async fn link_types(&self) -> Result<Arc<Vec<LinkType>>, GatehousePermissionsError> {
        let link_types = self
            .link_types
            .get_or_try_init(|| async {
                lift(self.directory.link_types().await).map(Arc::new)
            })
            .await?;
        Ok(link_types.clone())
    }

    /// The groups `user` belongs to within `organization`, whether recorded
    /// on the user or in the group's member list. Without an organization a
    /// user has no groups.
    pub async fn user_groups(
        &mut self,
        organization: Option<&Organization>,
        user: &User,
    ) -> Result<BTreeSet<GroupId>, GatehousePermissionsError> {
        let Some(organization) = organization else {
            return Ok(BTreeSet::new());
        };
        let groups = self.groups(&organization.id).await?;
        Ok(group_membership(&organization.id, user, &groups))
    }

    /// The collections read by `query`
    pub async fn referenced_collection_ids(
        &self,
        query: &Query,
    ) -> Result<BTreeSet<CollectionId>, GatehousePermissionsError> {
        let link_types = self.link_types().await?;
        Ok(self.directory.referenced_collection_ids(query, &link_types))
    }

    /// Drop the memoized view, e.g. after its query changed
    pub fn forget_view(&mut self, id: &ViewId) {
        self.views.remove(id);
    }
}
