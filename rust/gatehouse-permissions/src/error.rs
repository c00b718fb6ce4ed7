use std::fmt::Display;

use gatehouse_model::{DocumentId, Resource, ResourceType};
use thiserror::Error;

/// The kinds of entity read through a [`crate::Directory`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A [`gatehouse_model::User`]
    User,
    /// A [`gatehouse_model::View`]
    View,
    /// A [`gatehouse_model::Collection`]
    Collection,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::User => write!(f, "User"),
            EntityKind::View => write!(f, "View"),
            EntityKind::Collection => write!(f, "Collection"),
        }
    }
}

/// The common error type used by this crate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatehousePermissionsError {
    /// The user lacks the role required on a resource
    #[error("No permission on {resource_type} '{resource_id}'")]
    ResourcePermissionDenied {
        /// Kind of the guarded resource
        resource_type: ResourceType,
        /// Identifier of the guarded resource
        resource_id: String,
    },

    /// The user may neither change the document through the collection
    /// nor as its owner
    #[error("No permission on document '{document_id}'")]
    DocumentPermissionDenied {
        /// Identifier of the guarded document
        document_id: DocumentId,
    },

    /// The user lacks a role on some resource of the given kind
    #[error("No permission on {resource_type}")]
    PermissionDenied {
        /// Kind of the guarded resource
        resource_type: ResourceType,
    },

    /// An entity the evaluation depends on does not exist
    #[error("{entity} '{id}' was not found")]
    NotFound {
        /// What was looked up
        entity: EntityKind,
        /// The identifier that was looked up
        id: String,
    },

    /// The backing store failed to answer. Host directories convert their
    /// own failures into this variant.
    #[error("Directory lookup failed: {0}")]
    Directory(String),

    /// A directory cache could not be set up
    #[error("Could not initialize directory cache: {0}")]
    Cache(String),
}

impl GatehousePermissionsError {
    /// Denial raised for a resource
    pub fn resource_denied<R>(resource: &R) -> Self
    where
        R: Resource + ?Sized,
    {
        GatehousePermissionsError::ResourcePermissionDenied {
            resource_type: resource.resource_type(),
            resource_id: resource.id().to_owned(),
        }
    }

    /// Lookup failure for `id`
    pub fn not_found(entity: EntityKind, id: impl Display) -> Self {
        GatehousePermissionsError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// True for the variants that reject access, as opposed to lookup
    /// failures
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            GatehousePermissionsError::ResourcePermissionDenied { .. }
                | GatehousePermissionsError::DocumentPermissionDenied { .. }
                | GatehousePermissionsError::PermissionDenied { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_model::Collection;

    #[test]
    fn it_tells_denials_apart_from_lookup_failures() {
        let denied = GatehousePermissionsError::resource_denied(&Collection::new("c1", "Tasks"));
        assert!(denied.is_denial());
        assert_eq!(denied.to_string(), "No permission on collection 'c1'");

        let missing = GatehousePermissionsError::not_found(EntityKind::User, "u9");
        assert!(!missing.is_denial());
        assert_eq!(missing.to_string(), "User 'u9' was not found");
    }
}
