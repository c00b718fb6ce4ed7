use serde::{Deserialize, Serialize};

use crate::{AttributeId, CollectionId, Permissions, Resource, ResourceType};

/// What a [`Collection`] is used for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurposeKind {
    /// No special semantics
    #[default]
    None,
    /// Documents are tasks assigned to users
    Tasks,
}

/// Collection-level configuration giving documents a designated owner.
///
/// When the purpose is [`PurposeKind::Tasks`] and an assignee attribute is
/// configured, the value of that attribute in a document names the users
/// who own the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purpose {
    /// The kind of purpose
    #[serde(default)]
    pub kind: PurposeKind,
    /// The attribute holding the assignee(s) of a task
    #[serde(default)]
    pub assignee_attribute_id: Option<AttributeId>,
}

impl Purpose {
    /// A task purpose whose assignees are stored in `attribute`
    pub fn tasks(attribute: impl Into<AttributeId>) -> Self {
        Self {
            kind: PurposeKind::Tasks,
            assignee_attribute_id: Some(attribute.into()),
        }
    }

    /// The attribute naming document owners, if this purpose defines one
    pub fn owner_attribute(&self) -> Option<&AttributeId> {
        match self.kind {
            PurposeKind::Tasks => self
                .assignee_attribute_id
                .as_ref()
                .filter(|attribute| !attribute.is_empty()),
            PurposeKind::None => None,
        }
    }
}

/// A set of documents sharing a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Identifier of the collection
    pub id: CollectionId,
    /// Display name
    pub name: String,
    /// Grants made on the collection
    #[serde(default)]
    pub permissions: Permissions,
    /// Ownership configuration of the documents
    #[serde(default)]
    pub purpose: Purpose,
}

impl Collection {
    /// Create a collection without any grants or purpose
    pub fn new(id: impl Into<CollectionId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            permissions: Permissions::default(),
            purpose: Purpose::default(),
        }
    }

    /// Replace the grants of the collection
    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Replace the purpose of the collection
    pub fn with_purpose(mut self, purpose: Purpose) -> Self {
        self.purpose = purpose;
        self
    }
}

impl Resource for Collection {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn resource_type(&self) -> ResourceType {
        ResourceType::Collection
    }

    fn permissions(&self) -> &Permissions {
        &self.permissions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_only_names_an_owner_attribute_for_tasks() {
        assert_eq!(
            Purpose::tasks("a1").owner_attribute(),
            Some(&AttributeId::from("a1"))
        );
        assert_eq!(Purpose::tasks("").owner_attribute(), None);

        let untyped = Purpose {
            kind: PurposeKind::None,
            assignee_attribute_id: Some("a1".into()),
        };
        assert_eq!(untyped.owner_attribute(), None);
    }
}
