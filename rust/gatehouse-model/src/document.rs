use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{AttributeId, CollectionId, DocumentId, UserId};

/// A record stored in a [`crate::Collection`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier of the document
    pub id: DocumentId,
    /// The collection the document belongs to
    pub collection_id: CollectionId,
    /// The user who created the document, if known
    #[serde(default)]
    pub created_by: Option<UserId>,
    /// Attribute values keyed by attribute id
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Document {
    /// Create an empty document with no recorded creator
    pub fn new(id: impl Into<DocumentId>, collection_id: impl Into<CollectionId>) -> Self {
        Self {
            id: id.into(),
            collection_id: collection_id.into(),
            created_by: None,
            data: Map::new(),
        }
    }

    /// Record the creator of the document
    pub fn created_by(mut self, user: impl Into<UserId>) -> Self {
        self.created_by = Some(user.into());
        self
    }

    /// Set the value of `attribute`
    pub fn with_value(
        mut self,
        attribute: impl Into<AttributeId>,
        value: impl Into<Value>,
    ) -> Self {
        let attribute: AttributeId = attribute.into();
        self.data.insert(attribute.into(), value.into());
        self
    }

    /// The value of `attribute`, if the document has one
    pub fn value(&self, attribute: &AttributeId) -> Option<&Value> {
        self.data.get(attribute.as_str())
    }

    /// True if `user` is recorded as the creator of the document
    pub fn is_created_by(&self, user: &UserId) -> bool {
        !user.is_empty() && self.created_by.as_ref() == Some(user)
    }
}
