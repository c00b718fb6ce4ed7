#![warn(missing_docs)]

//! Entities of a multi-tenant resource hierarchy, as seen by an
//! authorization engine:
//!
//! ```text
//! Organization
//!   └── Project
//!         ├── Collection ──── Document
//!         ├── LinkType (joins two Collections)
//!         └── View (a saved Query over Collections and LinkTypes)
//! ```
//!
//! Every level carries [`Permissions`]: the [`Role`]s granted to individual
//! users and to groups. A [`Role`] granted on an [`Organization`] or a
//! [`Project`] may be marked transitive, in which case it also applies to
//! everything nested beneath it.
//!
//! ```rust
//! use gatehouse_model::{Collection, Permissions, Resource, Role, RoleType, UserId};
//!
//! let alice = UserId::from("alice");
//! let collection = Collection::new("tasks", "Tasks")
//!     .with_permissions(Permissions::default().with_user(&alice, [Role::new(RoleType::Read)]));
//!
//! assert!(collection.permissions().has_user_grants(&alice));
//! ```
//!
//! The entities are plain snapshots. This crate never resolves what a user
//! may actually do; that is the job of `gatehouse-permissions`.

mod error;
pub use error::*;

mod identifier;
pub use identifier::*;

mod role;
pub use role::*;

mod permission;
pub use permission::*;

mod resource;
pub use resource::*;

mod workspace;
pub use workspace::*;

mod collection;
pub use collection::*;

mod document;
pub use document::*;

mod query;
pub use query::*;

mod view;
pub use view::*;

mod link_type;
pub use link_type::*;

mod user;
pub use user::*;

mod difference;
pub use difference::*;
