//! Opaque identifiers of the entities in the hierarchy.
//!
//! Identifiers are assigned by the external stores and are never interpreted
//! here, only compared. Each entity kind gets its own newtype so that a
//! [`UserId`] can not be passed where a [`GroupId`] is expected.

use serde::{Deserialize, Serialize};

macro_rules! identifier_type {
    ( $(#[$meta:meta])* $struct:ident ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $struct(String);

        impl $struct {
            /// The identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True for the empty identifier, which stores use to mean "unset"
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<String> for $struct {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $struct {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<$struct> for String {
            fn from(value: $struct) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $struct {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $struct {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $struct {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

identifier_type!(
    /// Identifies a [`crate::User`]
    UserId
);
identifier_type!(
    /// Identifies a [`crate::Group`]
    GroupId
);
identifier_type!(
    /// Identifies an [`crate::Organization`]
    OrganizationId
);
identifier_type!(
    /// Identifies a [`crate::Project`]
    ProjectId
);
identifier_type!(
    /// Identifies a [`crate::Collection`]
    CollectionId
);
identifier_type!(
    /// Identifies a [`crate::View`]
    ViewId
);
identifier_type!(
    /// Identifies a [`crate::LinkType`]
    LinkTypeId
);
identifier_type!(
    /// Identifies a [`crate::Document`]
    DocumentId
);
identifier_type!(
    /// Identifies an attribute of a [`crate::Collection`]
    AttributeId
);
