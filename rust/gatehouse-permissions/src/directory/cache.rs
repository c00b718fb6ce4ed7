use std::{collections::BTreeSet, hash::Hash, sync::Arc};

use async_trait::async_trait;
use gatehouse_model::{
    Collection, CollectionId, Group, LinkType, OrganizationId, Query, User, UserId, View, ViewId,
};
use sieve_cache::SieveCache;
use tokio::sync::Mutex;

use crate::{GatehousePermissionsError, Settings};

use super::Directory;

type Shelf<K, V> = Arc<Mutex<SieveCache<K, V>>>;

fn shelf<K, V>(capacity: usize) -> Result<Shelf<K, V>, GatehousePermissionsError>
where
    K: Eq + Hash + Clone,
{
    Ok(Arc::new(Mutex::new(SieveCache::new(capacity).map_err(
        |error| GatehousePermissionsError::Cache(error.to_string()),
    )?)))
}

/// A [DirectoryCache] fronts another [Directory] with bounded [SieveCache]s
/// for users, views, collections and the groups of each organization. The
/// cached entities carry no per-user state, so one cache may serve many
/// requests.
///
/// Organization member lists and link types are always read through. Call
/// the `forget_*` methods when the underlying entity changes.
#[derive(Clone)]
pub struct DirectoryCache<D>
where
    D: Directory,
{
    directory: D,
    users: Shelf<UserId, User>,
    views: Shelf<ViewId, View>,
    collections: Shelf<CollectionId, Collection>,
    groups: Shelf<OrganizationId, Vec<Group>>,
}

impl<D> DirectoryCache<D>
where
    D: Directory,
{
    /// Wrap `directory` so that each kind of entity is cached up to
    /// `capacity` entries
    pub fn new(directory: D, capacity: usize) -> Result<Self, GatehousePermissionsError> {
        Ok(Self {
            directory,
            users: shelf(capacity)?,
            views: shelf(capacity)?,
            collections: shelf(capacity)?,
            groups: shelf(capacity)?,
        })
    }

    /// Wrap `directory` using the configured capacity
    pub fn from_settings(
        directory: D,
        settings: &Settings,
    ) -> Result<Self, GatehousePermissionsError> {
        Self::new(directory, settings.directory_cache_capacity)
    }

    /// Drop the cached copy of a user
    pub async fn forget_user(&self, id: &UserId) {
        self.users.lock().await.remove(id);
    }

    /// Drop the cached copy of a view
    pub async fn forget_view(&self, id: &ViewId) {
        self.views.lock().await.remove(id);
    }

    /// Drop the cached copy of a collection
    pub async fn forget_collection(&self, id: &CollectionId) {
        self.collections.lock().await.remove(id);
    }

    /// Drop the cached groups of an organization
    pub async fn forget_groups(&self, organization: &OrganizationId) {
        self.groups.lock().await.remove(organization);
    }
}

async fn read_through<K, V, E, F>(
    shelf: &Shelf<K, V>,
    key: &K,
    fetch: F,
) -> Result<Option<V>, E>
where
    K: Eq + Hash + Clone,
    V: Clone,
    F: Future<Output = Result<Option<V>, E>>,
{
    let mut cache = shelf.lock().await;
    if let Some(value) = cache.get(key) {
        return Ok(Some(value.clone()));
    }
    if let Some(value) = fetch.await? {
        cache.insert(key.clone(), value.clone());
        return Ok(Some(value));
    }

    Ok(None)
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<D> Directory for DirectoryCache<D>
where
    D: Directory,
{
    type Error = D::Error;

    async fn user(&self, id: &UserId) -> Result<Option<User>, Self::Error> {
        read_through(&self.users, id, self.directory.user(id)).await
    }

    async fn users(&self, organization: &OrganizationId) -> Result<Vec<User>, Self::Error> {
        self.directory.users(organization).await
    }

    async fn groups(&self, organization: &OrganizationId) -> Result<Vec<Group>, Self::Error> {
        let fetch = async { self.directory.groups(organization).await.map(Some) };
        Ok(read_through(&self.groups, organization, fetch)
            .await?
            .unwrap_or_default())
    }

    async fn view(&self, id: &ViewId) -> Result<Option<View>, Self::Error> {
        read_through(&self.views, id, self.directory.view(id)).await
    }

    async fn collection(&self, id: &CollectionId) -> Result<Option<Collection>, Self::Error> {
        read_through(&self.collections, id, self.directory.collection(id)).await
    }

    async fn link_types(&self) -> Result<Vec<LinkType>, Self::Error> {
        self.directory.link_types().await
    }

    fn referenced_collection_ids(
        &self,
        query: &Query,
        link_types: &[LinkType],
    ) -> BTreeSet<CollectionId> {
        self.directory.referenced_collection_ids(query, link_types)
    }
}
