use std::collections::HashMap;

use parking_lot::RwLock;

use super::{join_tolerant, Notifier, StoreEvent};
use crate::backend::Backend;
use crate::error::Result;
use crate::models::{AssignedObject, GraphId, RoadmapId, SharedRoadmap, UserId};

#[derive(Default)]
struct SharedState {
    roadmaps: Vec<SharedRoadmap>,
    owner_names: HashMap<UserId, String>,
}

/// Roadmaps other users shared with the current user.
///
/// Both the list and the owner name table are rebuilt from scratch on every
/// refresh.
pub struct SharingView {
    backend: Backend,
    notifier: Notifier,
    state: RwLock<SharedState>,
}

impl SharingView {
    pub fn new(backend: Backend, notifier: Notifier) -> Self {
        Self {
            backend,
            notifier,
            state: RwLock::new(SharedState::default()),
        }
    }

    pub fn roadmaps(&self) -> Vec<SharedRoadmap> {
        self.state.read().roadmaps.clone()
    }

    pub fn find(&self, id: &RoadmapId) -> Option<AssignedObject> {
        self.state
            .read()
            .roadmaps
            .iter()
            .find(|shared| &shared.roadmap.id == id)
            .map(|shared| shared.roadmap.clone())
    }

    pub fn display_name(&self, owner: &UserId) -> Option<String> {
        self.state.read().owner_names.get(owner).cloned()
    }

    /// Rebuild the shared roadmap list for `user`.
    ///
    /// Each shared graph is resolved to its roadmap and its owner's name
    /// concurrently. An item whose lookup fails, or that has no roadmap, is
    /// left out rather than failing the whole refresh.
    pub async fn refresh(&self, user: &UserId) -> Result<Vec<SharedRoadmap>> {
        let shared = self.backend.shared_with(user).await?;

        let resolved = join_tolerant(
            "shared roadmaps",
            shared.iter().map(|file| self.resolve(&file.object)),
        )
        .await;

        let mut roadmaps: Vec<SharedRoadmap> = Vec::new();
        let mut owner_names = HashMap::new();
        for item in resolved.into_iter().flatten().flatten() {
            if roadmaps.iter().any(|r| r.roadmap.id == item.roadmap.id) {
                continue;
            }
            owner_names.insert(item.roadmap.owner.clone(), item.owner_name.clone());
            roadmaps.push(item);
        }

        tracing::debug!(count = roadmaps.len(), "loaded shared roadmaps");
        *self.state.write() = SharedState {
            roadmaps: roadmaps.clone(),
            owner_names,
        };
        self.notifier.emit(StoreEvent::SharedRoadmapsChanged);
        Ok(roadmaps)
    }

    pub fn clear(&self) {
        *self.state.write() = SharedState::default();
    }

    async fn resolve(&self, graph: &GraphId) -> Result<Option<SharedRoadmap>> {
        let Some(roadmap) = self
            .backend
            .roadmaps_for_graph(graph)
            .await?
            .into_iter()
            .next()
        else {
            return Ok(None);
        };

        let owner_name = self
            .backend
            .username(&roadmap.owner)
            .await?
            .unwrap_or_else(|| roadmap.owner.to_string());

        Ok(Some(SharedRoadmap {
            roadmap,
            owner_name,
        }))
    }
}
