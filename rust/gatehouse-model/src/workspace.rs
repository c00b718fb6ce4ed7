use serde::{Deserialize, Serialize};

use crate::{OrganizationId, Permissions, ProjectId, Resource, ResourceType};

/// The top of the hierarchy. Owns users, groups and projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    /// Identifier of the organization
    pub id: OrganizationId,
    /// Short, human readable code
    pub code: String,
    /// Grants made on the organization
    #[serde(default)]
    pub permissions: Permissions,
}

impl Organization {
    /// Create an organization without any grants
    pub fn new(id: impl Into<OrganizationId>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            permissions: Permissions::default(),
        }
    }

    /// Replace the grants of the organization
    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }
}

impl Resource for Organization {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn resource_type(&self) -> ResourceType {
        ResourceType::Organization
    }

    fn permissions(&self) -> &Permissions {
        &self.permissions
    }
}

/// A workspace inside an [`Organization`] holding collections, link types
/// and views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Identifier of the project
    pub id: ProjectId,
    /// Short, human readable code
    pub code: String,
    /// Grants made on the project
    #[serde(default)]
    pub permissions: Permissions,
}

impl Project {
    /// Create a project without any grants
    pub fn new(id: impl Into<ProjectId>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            permissions: Permissions::default(),
        }
    }

    /// Replace the grants of the project
    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }
}

impl Resource for Project {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn resource_type(&self) -> ResourceType {
        ResourceType::Project
    }

    fn permissions(&self) -> &Permissions {
        &self.permissions
    }
}
