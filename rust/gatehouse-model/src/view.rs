use serde::{Deserialize, Serialize};

use crate::{Permissions, Query, Resource, ResourceType, UserId, ViewId};

/// A saved [`Query`] shared with other users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// Identifier of the view
    pub id: ViewId,
    /// Display name
    pub name: String,
    /// The user who authored the view
    #[serde(default)]
    pub author_id: Option<UserId>,
    /// What the view shows
    #[serde(default)]
    pub query: Query,
    /// Grants made on the view
    #[serde(default)]
    pub permissions: Permissions,
}

impl View {
    /// Create a view with no author, an empty query and no grants
    pub fn new(id: impl Into<ViewId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            author_id: None,
            query: Query::default(),
            permissions: Permissions::default(),
        }
    }

    /// Record the author of the view
    pub fn authored_by(mut self, author: impl Into<UserId>) -> Self {
        self.author_id = Some(author.into());
        self
    }

    /// Replace the query of the view
    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Replace the grants of the view
    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// The author of the view, treating an empty id as no author
    pub fn author(&self) -> Option<&UserId> {
        self.author_id.as_ref().filter(|author| !author.is_empty())
    }
}

impl Resource for View {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn resource_type(&self) -> ResourceType {
        ResourceType::View
    }

    fn permissions(&self) -> &Permissions {
        &self.permissions
    }
}
