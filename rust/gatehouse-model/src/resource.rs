use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{CollectionId, GatehouseModelError, Permissions};

/// The kind of a node in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    /// An [`crate::Organization`]
    Organization,
    /// A [`crate::Project`]
    Project,
    /// A [`crate::Collection`]
    Collection,
    /// A [`crate::View`]
    View,
    /// A [`crate::LinkType`]
    LinkType,
    /// A [`crate::Document`]
    Document,
}

impl ResourceType {
    /// The canonical name of this [`ResourceType`]
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Organization => "organization",
            ResourceType::Project => "project",
            ResourceType::Collection => "collection",
            ResourceType::View => "view",
            ResourceType::LinkType => "linktype",
            ResourceType::Document => "document",
        }
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = GatehouseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "organization" => ResourceType::Organization,
            "project" => ResourceType::Project,
            "collection" => ResourceType::Collection,
            "view" => ResourceType::View,
            "linktype" | "link_type" => ResourceType::LinkType,
            "document" => ResourceType::Document,
            _ => return Err(GatehouseModelError::UnknownResourceType(s.to_owned())),
        })
    }
}

/// Anything roles can be granted on.
///
/// Implemented by [`crate::Organization`], [`crate::Project`],
/// [`crate::Collection`], [`crate::View`] and [`crate::LinkType`].
pub trait Resource {
    /// The identifier of the resource, unique within its [`ResourceType`]
    fn id(&self) -> &str;

    /// The kind of the resource
    fn resource_type(&self) -> ResourceType;

    /// The explicit grants made on the resource
    fn permissions(&self) -> &Permissions;

    /// The Collections a [`crate::LinkType`] joins. `None` for every other
    /// kind of resource.
    fn linked_collection_ids(&self) -> Option<&[CollectionId]> {
        None
    }

    /// The two Collections a [`crate::LinkType`] joins. Ids past the second
    /// are ignored; fewer than two bind nothing.
    fn bound_collection_ids(&self) -> Option<(&CollectionId, &CollectionId)> {
        match self.linked_collection_ids()? {
            [first, second, ..] => Some((first, second)),
            _ => None,
        }
    }
}

impl<T: Resource + ?Sized> Resource for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn resource_type(&self) -> ResourceType {
        (**self).resource_type()
    }

    fn permissions(&self) -> &Permissions {
        (**self).permissions()
    }

    fn linked_collection_ids(&self) -> Option<&[CollectionId]> {
        (**self).linked_collection_ids()
    }
}

impl<T: Resource + ?Sized> Resource for std::sync::Arc<T> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn resource_type(&self) -> ResourceType {
        (**self).resource_type()
    }

    fn permissions(&self) -> &Permissions {
        (**self).permissions()
    }

    fn linked_collection_ids(&self) -> Option<&[CollectionId]> {
        (**self).linked_collection_ids()
    }
}
