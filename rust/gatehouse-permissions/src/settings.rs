use serde::{Deserialize, Serialize};

/// Tunables of the engine. Every field has a default, so partial
/// configuration documents deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Only users who can read the enclosing Organization, and the enclosing
    /// Project (or every Project through a transitive Organization Read),
    /// hold roles on resources inside them.
    pub require_workspace_read: bool,
    /// Capacity of each cache kept by a [`crate::DirectoryCache`]
    pub directory_cache_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            require_workspace_read: true,
            directory_cache_capacity: 1024,
        }
    }
}
