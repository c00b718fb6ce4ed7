#![warn(missing_docs)]

//! Role resolution and permission checks over the entities of
//! [`gatehouse_model`].
//!
//! A [`PermissionGate`] is created per session over a [`Directory`] (the
//! read-only source of users, groups, views, collections and link types).
//! It answers questions like "may this user write to this collection?":
//!
//! ```ignore
//! let mut gate = PermissionGate::new(directory);
//! let workspace = Workspace::organization(&organization).with_project(&project);
//!
//! gate.check_role(workspace, &collection, RoleType::Write, &user_id).await?;
//! ```
//!
//! A user's roles on a resource are the roles granted on it to the user or
//! to any of the user's groups, plus the transitive roles granted on the
//! enclosing Organization and Project. Beyond that, the gate knows about:
//!
//! - link types, which are only usable by users who can read both joined
//!   collections
//! - the active view, through which a user reaches the collections its query
//!   reads with the roles of the view's author
//! - document ownership, which lets contributors and assignees change
//!   documents they could not otherwise touch
//!
//! Every decision is memoized for the lifetime of the gate; see
//! [`PermissionGate::invalidate_cache`]. Entities can also be cached across
//! sessions by wrapping the directory in a [`DirectoryCache`].

mod sync;
pub use sync::*;

mod error;
pub use error::*;

mod settings;
pub use settings::*;

mod workspace;
pub use workspace::*;

mod directory;
pub use directory::*;

mod lookup;
pub use lookup::*;

mod resolver;
pub use resolver::*;

mod gate;
pub use gate::*;

mod mediation;

mod ownership;
pub use ownership::*;

mod reporting;
