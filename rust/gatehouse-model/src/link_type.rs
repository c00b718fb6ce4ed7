use serde::{Deserialize, Serialize};

use crate::{CollectionId, LinkTypeId, Permissions, Resource, ResourceType};

/// A relation between the documents of two collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkType {
    /// Identifier of the link type
    pub id: LinkTypeId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// The two joined collections. Stores may hand out malformed link types
    /// with fewer entries; only the first two are ever considered.
    pub collection_ids: Vec<CollectionId>,
    /// Grants made on the link type
    #[serde(default)]
    pub permissions: Permissions,
}

impl LinkType {
    /// Create a link type joining `first` and `second`, without grants
    pub fn new(
        id: impl Into<LinkTypeId>,
        first: impl Into<CollectionId>,
        second: impl Into<CollectionId>,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            collection_ids: vec![first.into(), second.into()],
            permissions: Permissions::default(),
        }
    }

    /// Replace the grants of the link type
    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }
}

impl Resource for LinkType {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn resource_type(&self) -> ResourceType {
        ResourceType::LinkType
    }

    fn permissions(&self) -> &Permissions {
        &self.permissions
    }

    fn linked_collection_ids(&self) -> Option<&[CollectionId]> {
        Some(&self.collection_ids)
    }
}
