use std::{collections::BTreeSet, sync::Arc};

use async_trait::async_trait;
use gatehouse_model::{
    Collection, CollectionId, Group, LinkType, OrganizationId, Query, User, UserId, View, ViewId,
};

use crate::{ConditionalSend, ConditionalSync, GatehousePermissionsError};

mod cache;
pub use cache::*;

mod memory;
pub use memory::*;

/// A [Directory] is the read-only source of the entities that role
/// resolution depends on: users, the groups of an organization, views,
/// collections and link types.
///
/// Implementations answer "not found" with `Ok(None)` (or an empty list) and
/// reserve `Err` for failures of the store itself.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait Directory: ConditionalSync {
    /// Failure raised by the backing store
    type Error: Into<GatehousePermissionsError> + ConditionalSend;

    /// Look up a user by id
    async fn user(&self, id: &UserId) -> Result<Option<User>, Self::Error>;

    /// All users that belong to an organization
    async fn users(&self, organization: &OrganizationId) -> Result<Vec<User>, Self::Error>;

    /// All groups defined in an organization
    async fn groups(&self, organization: &OrganizationId) -> Result<Vec<Group>, Self::Error>;

    /// Look up a view by id
    async fn view(&self, id: &ViewId) -> Result<Option<View>, Self::Error>;

    /// Look up a collection by id
    async fn collection(&self, id: &CollectionId) -> Result<Option<Collection>, Self::Error>;

    /// All link types of the current project
    async fn link_types(&self) -> Result<Vec<LinkType>, Self::Error>;

    /// The collections a view's query reads from, given every link type it
    /// might join through.
    fn referenced_collection_ids(
        &self,
        query: &Query,
        link_types: &[LinkType],
    ) -> BTreeSet<CollectionId> {
        query.collection_ids(link_types)
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<T> Directory for Arc<T>
where
    T: Directory + ?Sized,
{
    type Error = T::Error;

    async fn user(&self, id: &UserId) -> Result<Option<User>, Self::Error> {
        T::user(self, id).await
    }

    async fn users(&self, organization: &OrganizationId) -> Result<Vec<User>, Self::Error> {
        T::users(self, organization).await
    }

    async fn groups(&self, organization: &OrganizationId) -> Result<Vec<Group>, Self::Error> {
        T::groups(self, organization).await
    }

    async fn view(&self, id: &ViewId) -> Result<Option<View>, Self::Error> {
        T::view(self, id).await
    }

    async fn collection(&self, id: &CollectionId) -> Result<Option<Collection>, Self::Error> {
        T::collection(self, id).await
    }

    async fn link_types(&self) -> Result<Vec<LinkType>, Self::Error> {
        T::link_types(self).await
    }

    fn referenced_collection_ids(
        &self,
        query: &Query,
        link_types: &[LinkType],
    ) -> BTreeSet<CollectionId> {
        T::referenced_collection_ids(self, query, link_types)
    }
}
