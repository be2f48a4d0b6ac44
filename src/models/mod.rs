//! Domain models mirrored from the roadmap backend.
//!
//! # Core Concepts
//!
//! ## Backend Entities
//!
//! - [`AssignedObject`]: The user-facing roadmap handle. One roadmap is one
//!   `AssignedObject` plus the backend graph it references.
//! - [`Node`] / [`Edge`]: The DAG itself. Every node owns a [`ResourceList`]
//!   through its `enrichment`; edges borrow the enrichment of their source.
//! - [`IndexedResource`]: A positioned entry in a resource list.
//! - [`Check`]: A per-(user, resource) completion flag.
//! - [`UploadedFile`]: A stored blob holding a resource's free-text content.
//!
//! ## Client-only Views
//!
//! - [`SharedRoadmap`]: A roadmap someone else shared with the current user,
//!   annotated with the sharer's display name.
//!
//! All identifiers are opaque strings allocated by the backend, wrapped in
//! distinct newtypes so they cannot be mixed up.

mod check;
mod file;
mod graph;
mod ids;
mod resource;
mod roadmap;

pub use check::*;
pub use file::*;
pub use graph::*;
pub use ids::*;
pub use resource::*;
pub use roadmap::*;
