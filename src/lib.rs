//! Client-side state layer for editable learning roadmaps.
//!
//! Mirrors a remote, concept-oriented backend (roadmaps as DAGs of nodes,
//! each node carrying an ordered resource list, per-user completion checks
//! and free-text content per resource) and keeps that mirror consistent
//! under optimistic edits. [`RoadmapClient`] wires everything together.

pub mod auth;
pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod session;
pub mod store;

pub use client::RoadmapClient;
pub use config::ClientConfig;
pub use error::{Result, SyncError};
pub use session::{Identity, Session, SessionFile};
pub use store::{LoadStatus, StoreEvent};
