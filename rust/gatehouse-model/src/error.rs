use thiserror::Error;

/// The common error type used by this crate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatehouseModelError {
    /// A string could not be interpreted as a [`crate::RoleType`]
    #[error("Unknown role type: {0}")]
    UnknownRoleType(String),

    /// A string could not be interpreted as a [`crate::ResourceType`]
    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),
}
