use serde::{Deserialize, Serialize};

use super::ids::{GraphId, RoadmapId, UserId};

/// The user-facing handle of a roadmap.
///
/// A roadmap is this record plus the backend graph named by `object`. The two are
/// created together (graph first) and deleted together (graph first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedObject {
    #[serde(rename = "_id")]
    pub id: RoadmapId,
    pub owner: UserId,
    /// The backing graph.
    pub object: GraphId,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl AssignedObject {
    pub fn graph(&self) -> &GraphId {
        &self.object
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }
}

/// A roadmap another user shared with the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedRoadmap {
    #[serde(flatten)]
    pub roadmap: AssignedObject,
    /// Display name of the sharer. Falls back to the owner's id when the
    /// backend has no username for them.
    pub owner_name: String,
}
