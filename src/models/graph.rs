use serde::{Deserialize, Serialize};

use super::ids::{EdgeId, GraphId, NodeId, ResourceListId};

/// A vertex of a roadmap DAG.
///
/// Titles are unique within a graph; the client enforces this before any
/// create or rename reaches the backend. Every node owns the resource list
/// named by `enrichment` and is destroyed together with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "_id")]
    pub id: NodeId,
    /// The graph this node belongs to.
    pub parent: GraphId,
    pub title: String,
    pub enrichment: ResourceListId,
    /// Client-side layout hint. Never sent to the backend.
    #[serde(skip)]
    pub position: Option<Position>,
}

/// Canvas coordinates supplied by the caller when a node is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A directed dependency between two nodes.
///
/// `enrichment` is copied from the source node when the edge is created; the
/// edge does not own a list of its own. At most one edge exists per ordered
/// `(source, target)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(rename = "_id")]
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub enrichment: ResourceListId,
}

impl Edge {
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }

    pub fn connects(&self, source: &NodeId, target: &NodeId) -> bool {
        &self.source == source && &self.target == target
    }
}
