use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::GatehouseModelError;

/// A capability that can be granted on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoleType {
    /// See the resource and its content
    Read,
    /// Change the content of the resource
    Write,
    /// Add content (e.g. create documents) to the resource
    Contribute,
    /// Remove content from the resource
    Delete,
    /// Change the resource itself, including its permissions
    Manage,
}

impl RoleType {
    /// Every [`RoleType`], in declaration order
    pub const ALL: [RoleType; 5] = [
        RoleType::Read,
        RoleType::Write,
        RoleType::Contribute,
        RoleType::Delete,
        RoleType::Manage,
    ];

    /// The canonical name of this [`RoleType`]
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleType::Read => "Read",
            RoleType::Write => "Write",
            RoleType::Contribute => "Contribute",
            RoleType::Delete => "Delete",
            RoleType::Manage => "Manage",
        }
    }
}

impl Display for RoleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RoleType {
    type Err = GatehouseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleType::ALL
            .into_iter()
            .find(|role_type| role_type.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| GatehouseModelError::UnknownRoleType(s.to_owned()))
    }
}

/// A [`RoleType`] as it is granted on a resource.
///
/// A transitive role granted on an Organization or a Project also applies
/// to every resource nested beneath it. On any other resource the flag has
/// no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Role {
    /// The granted capability
    #[serde(rename = "type")]
    pub role_type: RoleType,
    /// Whether the grant propagates down the hierarchy
    #[serde(default)]
    pub transitive: bool,
}

impl Role {
    /// A non-transitive grant of `role_type`
    pub fn new(role_type: RoleType) -> Self {
        Self {
            role_type,
            transitive: false,
        }
    }

    /// A grant of `role_type` that propagates down the hierarchy
    pub fn transitive(role_type: RoleType) -> Self {
        Self {
            role_type,
            transitive: true,
        }
    }

    /// True if this is a transitive grant of [`RoleType::Read`]
    pub fn is_transitive_read(&self) -> bool {
        self.transitive && self.role_type == RoleType::Read
    }
}

impl From<RoleType> for Role {
    fn from(value: RoleType) -> Self {
        Role::new(value)
    }
}
