use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;

use super::{join_tolerant, Notifier, ResourceListEngine, SharingView, StoreEvent};
use crate::backend::Backend;
use crate::error::{Result, SyncError};
use crate::models::*;
use crate::session::Session;

/// Lifecycle of the loaded roadmap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Unloaded,
    Loading,
    Loaded,
    Error(String),
}

/// The one roadmap currently open.
struct ActiveRoadmap {
    roadmap: AssignedObject,
    shared: bool,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    selected: Option<NodeId>,
}

impl ActiveRoadmap {
    fn new(roadmap: AssignedObject, shared: bool) -> Self {
        Self {
            roadmap,
            shared,
            nodes: Vec::new(),
            edges: Vec::new(),
            selected: None,
        }
    }

    fn node(&self, id: &NodeId) -> Result<&Node> {
        self.nodes
            .iter()
            .find(|n| &n.id == id)
            .ok_or_else(|| SyncError::not_found("Node"))
    }
}

#[derive(Default)]
struct DagState {
    roadmaps: Vec<AssignedObject>,
    status: LoadStatus,
    active: Option<ActiveRoadmap>,
}

fn no_roadmap() -> SyncError {
    SyncError::not_found("Loaded roadmap")
}

/// Owns the user's roadmaps and the graph of the roadmap currently loaded.
///
/// Node and edge edits are validated against the local mirror (unique titles,
/// unique edges) before anything reaches the backend, and are applied locally
/// only after the backend accepted them. Graph edits run one at a time, so a
/// check always sees the result of the edit before it.
pub struct RoadmapManager {
    backend: Backend,
    session: Session,
    resources: Arc<ResourceListEngine>,
    sharing: Arc<SharingView>,
    notifier: Notifier,
    state: RwLock<DagState>,
    prefetch: Mutex<Option<JoinHandle<()>>>,
    edits: tokio::sync::Mutex<()>,
}

impl RoadmapManager {
    pub fn new(
        backend: Backend,
        session: Session,
        resources: Arc<ResourceListEngine>,
        sharing: Arc<SharingView>,
        notifier: Notifier,
    ) -> Self {
        Self {
            backend,
            session,
            resources,
            sharing,
            notifier,
            state: RwLock::new(DagState::default()),
            prefetch: Mutex::new(None),
            edits: tokio::sync::Mutex::new(()),
        }
    }

    // ============================================================
    // Read access
    // ============================================================

    pub fn roadmaps(&self) -> Vec<AssignedObject> {
        self.state.read().roadmaps.clone()
    }

    pub fn status(&self) -> LoadStatus {
        self.state.read().status.clone()
    }

    pub fn active_roadmap(&self) -> Option<AssignedObject> {
        self.state.read().active.as_ref().map(|a| a.roadmap.clone())
    }

    /// Whether the loaded roadmap belongs to someone else.
    pub fn is_shared(&self) -> bool {
        self.state.read().active.as_ref().is_some_and(|a| a.shared)
    }

    pub fn nodes(&self) -> Vec<Node> {
        self.state
            .read()
            .active
            .as_ref()
            .map(|a| a.nodes.clone())
            .unwrap_or_default()
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.state
            .read()
            .active
            .as_ref()
            .map(|a| a.edges.clone())
            .unwrap_or_default()
    }

    pub fn node(&self, id: &NodeId) -> Option<Node> {
        let state = self.state.read();
        state.active.as_ref()?.node(id).ok().cloned()
    }

    pub fn selected_node(&self) -> Option<Node> {
        let state = self.state.read();
        let active = state.active.as_ref()?;
        let selected = active.selected.as_ref()?;
        active.node(selected).ok().cloned()
    }

    // ============================================================
    // Roadmaps
    // ============================================================

    /// Replace the local roadmap list with the user's roadmaps.
    pub async fn list_own_roadmaps(&self) -> Result<Vec<AssignedObject>> {
        let user = self.session.require_user()?;

        let outcome = self.backend.user_roadmaps(&user).await;
        let mut state = self.state.write();
        let result = match outcome {
            Ok(roadmaps) => {
                state.roadmaps = roadmaps.clone();
                Ok(roadmaps)
            }
            Err(e) => {
                state.roadmaps.clear();
                Err(e)
            }
        };
        drop(state);

        self.notifier.emit(StoreEvent::RoadmapsChanged);
        result
    }

    pub async fn list_shared_roadmaps(&self) -> Result<Vec<SharedRoadmap>> {
        let user = self.session.require_user()?;
        self.sharing.refresh(&user).await
    }

    /// Create a graph, then the roadmap handle referencing it, then refresh
    /// the roadmap list from the backend.
    pub async fn create_roadmap(&self, title: &str, description: &str) -> Result<RoadmapId> {
        let user = self.session.require_user()?;
        let title = title.trim();
        if title.is_empty() {
            return Err(SyncError::InvalidInput(
                "Roadmap title cannot be empty".to_string(),
            ));
        }

        let graph = self.backend.create_empty_graph(&user, title).await?;
        let id = self
            .backend
            .create_assigned_object(&user, &graph, title, description)
            .await?;
        tracing::info!(%id, %graph, "created roadmap");

        if let Err(e) = self.list_own_roadmaps().await {
            tracing::warn!("Roadmap created but list refresh failed: {}", e);
        }
        Ok(id)
    }

    /// Delete an owned roadmap: graph first, then its handle.
    pub async fn delete_roadmap(&self, id: &RoadmapId) -> Result<()> {
        let user = self.session.require_user()?;

        let roadmap = self
            .state
            .read()
            .roadmaps
            .iter()
            .find(|r| &r.id == id)
            .cloned();
        let roadmap = match roadmap {
            Some(roadmap) => roadmap,
            None if self.sharing.find(id).is_some() => {
                return Err(SyncError::PermissionDenied(
                    "Only the owner can delete this roadmap".to_string(),
                ))
            }
            None => return Err(SyncError::not_found("Roadmap")),
        };
        if !roadmap.is_owned_by(&user) {
            return Err(SyncError::PermissionDenied(
                "Only the owner can delete this roadmap".to_string(),
            ));
        }

        self.backend.delete_graph(&roadmap.object).await?;
        self.backend.delete_assigned_object(&roadmap.id).await?;

        let unloaded = {
            let mut state = self.state.write();
            state.roadmaps.retain(|r| &r.id != id);
            let was_active = state.active.as_ref().is_some_and(|a| &a.roadmap.id == id);
            if was_active {
                state.active = None;
                state.status = LoadStatus::Unloaded;
            }
            was_active
        };

        tracing::info!(%id, "deleted roadmap");
        self.notifier.emit(StoreEvent::RoadmapsChanged);
        if unloaded {
            self.notifier.emit(StoreEvent::GraphChanged);
        }
        Ok(())
    }

    /// Share the loaded roadmap with another user.
    pub async fn share_roadmap(&self, username: &str) -> Result<()> {
        let user = self.session.require_user()?;
        let roadmap = self.active_roadmap().ok_or_else(no_roadmap)?;

        let username = username.trim();
        let target = self
            .backend
            .user_by_username(username)
            .await?
            .ok_or_else(|| SyncError::not_found(format!("User '{}'", username)))?;
        if target == user {
            return Err(SyncError::conflict("Cannot share a roadmap with yourself"));
        }

        self.backend.share(&user, &roadmap.object, &target).await?;
        tracing::info!(roadmap = %roadmap.id, with = %target, "shared roadmap");
        Ok(())
    }

    /// Open a roadmap: fetch its nodes, then its edges.
    ///
    /// Whatever was loaded before is discarded first. Once the graph is in
    /// place, every node's resources and checks are prefetched in the
    /// background; see [`RoadmapManager::wait_for_prefetch`].
    pub async fn load_roadmap(&self, id: &RoadmapId) -> Result<()> {
        let user = self.session.require_user()?;

        let own = self
            .state
            .read()
            .roadmaps
            .iter()
            .find(|r| &r.id == id)
            .cloned();
        let roadmap = own
            .or_else(|| self.sharing.find(id))
            .ok_or_else(|| SyncError::not_found("Roadmap"))?;
        let shared = !roadmap.is_owned_by(&user);

        {
            let mut state = self.state.write();
            state.active = Some(ActiveRoadmap::new(roadmap.clone(), shared));
            state.status = LoadStatus::Loading;
        }
        self.notifier.emit(StoreEvent::GraphChanged);

        let fetched = self.fetch_graph(&roadmap.object).await;
        let lists = self.commit_load(id, fetched)?;
        self.notifier.emit(StoreEvent::GraphChanged);

        if let Some(lists) = lists {
            self.spawn_prefetch(lists);
        }
        Ok(())
    }

    /// Wait for the background prefetch started by the last load, if any.
    pub async fn wait_for_prefetch(&self) {
        let handle = self.prefetch.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::warn!("prefetch task failed: {}", e);
            }
        }
    }

    /// Forget every roadmap and the loaded graph.
    pub fn reset(&self) {
        *self.state.write() = DagState::default();
        self.notifier.emit(StoreEvent::RoadmapsChanged);
        self.notifier.emit(StoreEvent::GraphChanged);
    }

    // ============================================================
    // Nodes
    // ============================================================

    /// Add a node with a fresh resource list. The list is created first; if
    /// that fails no node is created.
    pub async fn add_node(&self, title: &str, position: Option<Position>) -> Result<Node> {
        let user = self.session.require_user()?;
        let title = title.trim();
        if title.is_empty() {
            return Err(SyncError::InvalidInput(
                "Node title cannot be empty".to_string(),
            ));
        }

        let _edit = self.edits.lock().await;
        let roadmap = {
            let state = self.state.read();
            let active = state.active.as_ref().ok_or_else(no_roadmap)?;
            if active.nodes.iter().any(|n| n.title == title) {
                return Err(SyncError::conflict("A node with this title already exists"));
            }
            active.roadmap.clone()
        };

        // Lists are unique per (owner, title), so scope the title to the roadmap.
        let list_title = format!("{} / {}", roadmap.title, title);
        let list = self
            .backend
            .create_resource_list(&user, &list_title)
            .await?;
        let id = self.backend.add_node(&roadmap.object, title, &list).await?;

        let node = Node {
            id,
            parent: roadmap.object.clone(),
            title: title.to_string(),
            enrichment: list,
            position,
        };
        self.with_active(&roadmap.id, |active| active.nodes.push(node.clone()));
        tracing::info!(node = %node.id, title, "added node");
        Ok(node)
    }

    pub async fn update_node_title(&self, id: &NodeId, new_title: &str) -> Result<()> {
        let title = new_title.trim();
        if title.is_empty() {
            return Err(SyncError::InvalidInput(
                "Node title cannot be empty".to_string(),
            ));
        }

        let _edit = self.edits.lock().await;
        let roadmap = {
            let state = self.state.read();
            let active = state.active.as_ref().ok_or_else(no_roadmap)?;
            active.node(id)?;
            if active.nodes.iter().any(|n| &n.id != id && n.title == title) {
                return Err(SyncError::conflict("A node with this title already exists"));
            }
            active.roadmap.clone()
        };

        self.backend
            .change_node_title(&roadmap.object, id, title)
            .await?;

        self.with_active(&roadmap.id, |active| {
            if let Some(node) = active.nodes.iter_mut().find(|n| &n.id == id) {
                node.title = title.to_string();
            }
        });
        Ok(())
    }

    /// Remove a node, its resource list and every edge touching it.
    ///
    /// Only the node removal has to succeed; a failed list deletion is logged
    /// and leaves the list orphaned on the backend.
    pub async fn delete_node(&self, id: &NodeId) -> Result<()> {
        let _edit = self.edits.lock().await;
        let (roadmap, list) = {
            let state = self.state.read();
            let active = state.active.as_ref().ok_or_else(no_roadmap)?;
            let node = active.node(id)?;
            (active.roadmap.clone(), node.enrichment.clone())
        };

        self.backend.remove_node(id).await?;
        if let Err(e) = self.backend.delete_resource_list(&list).await {
            tracing::warn!(node = %id, %list, "node removed but its resource list was not: {}", e);
        }

        self.with_active(&roadmap.id, |active| {
            active.nodes.retain(|n| &n.id != id);
            active.edges.retain(|e| !e.touches(id));
            if active.selected.as_ref() == Some(id) {
                active.selected = None;
            }
        });
        self.resources.forget(&list);
        tracing::info!(node = %id, "deleted node");
        Ok(())
    }

    // ============================================================
    // Edges
    // ============================================================

    /// Connect two nodes. The edge shares the source node's resource list.
    pub async fn add_edge(&self, source: &NodeId, target: &NodeId) -> Result<Edge> {
        let _edit = self.edits.lock().await;
        let (roadmap, enrichment) = {
            let state = self.state.read();
            let active = state.active.as_ref().ok_or_else(no_roadmap)?;
            if active.edges.iter().any(|e| e.connects(source, target)) {
                return Err(SyncError::conflict(
                    "Edge already exists between these nodes",
                ));
            }
            let source_node = active
                .node(source)
                .map_err(|_| SyncError::not_found("Source node"))?;
            active
                .node(target)
                .map_err(|_| SyncError::not_found("Target node"))?;
            (active.roadmap.clone(), source_node.enrichment.clone())
        };

        let id = self
            .backend
            .add_edge(&roadmap.object, source, target, &enrichment)
            .await?;

        let edge = Edge {
            id,
            source: source.clone(),
            target: target.clone(),
            enrichment,
        };
        self.with_active(&roadmap.id, |active| active.edges.push(edge.clone()));
        Ok(edge)
    }

    pub async fn delete_edge(&self, id: &EdgeId) -> Result<()> {
        let _edit = self.edits.lock().await;
        let roadmap = {
            let state = self.state.read();
            let active = state.active.as_ref().ok_or_else(no_roadmap)?;
            if !active.edges.iter().any(|e| &e.id == id) {
                return Err(SyncError::not_found("Edge"));
            }
            active.roadmap.clone()
        };

        self.backend.remove_edge(id).await?;

        self.with_active(&roadmap.id, |active| active.edges.retain(|e| &e.id != id));
        Ok(())
    }

    // ============================================================
    // Selection
    // ============================================================

    /// Select a node and load its resources.
    pub async fn select_node(&self, id: &NodeId) -> Result<Vec<IndexedResource>> {
        let (roadmap, list) = {
            let state = self.state.read();
            let active = state.active.as_ref().ok_or_else(no_roadmap)?;
            let node = active.node(id)?;
            (active.roadmap.id.clone(), node.enrichment.clone())
        };

        self.with_active(&roadmap, |active| active.selected = Some(id.clone()));
        self.resources.load_resources(&list).await
    }

    pub fn clear_selection(&self) {
        if let Some(active) = self.state.write().active.as_mut() {
            active.selected = None;
        }
        self.notifier.emit(StoreEvent::GraphChanged);
    }

    // ============================================================
    // Internals
    // ============================================================

    async fn fetch_graph(&self, graph: &GraphId) -> Result<(Vec<Node>, Vec<Edge>)> {
        let nodes = self.backend.graph_nodes(graph).await?;
        let edges = self.backend.graph_edges(graph).await?;
        Ok((nodes, edges))
    }

    /// Store a fetched graph if `id` is still the roadmap being loaded.
    /// Returns the resource lists to prefetch, or `None` if a newer load took
    /// over in the meantime.
    fn commit_load(
        &self,
        id: &RoadmapId,
        fetched: Result<(Vec<Node>, Vec<Edge>)>,
    ) -> Result<Option<Vec<ResourceListId>>> {
        let mut state = self.state.write();
        let still_current = state.active.as_ref().is_some_and(|a| &a.roadmap.id == id);
        if !still_current {
            tracing::debug!(roadmap = %id, "load superseded by a newer one");
            return Ok(None);
        }

        match fetched {
            Ok((nodes, edges)) => {
                let lists = nodes.iter().map(|n| n.enrichment.clone()).collect();
                if let Some(active) = state.active.as_mut() {
                    active.nodes = nodes;
                    active.edges = edges;
                }
                state.status = LoadStatus::Loaded;
                Ok(Some(lists))
            }
            Err(e) => {
                state.status = LoadStatus::Error(e.to_string());
                Err(e)
            }
        }
    }

    fn spawn_prefetch(&self, lists: Vec<ResourceListId>) {
        let resources = Arc::clone(&self.resources);
        let handle = tokio::spawn(async move {
            join_tolerant(
                "resource prefetch",
                lists.iter().map(|list| resources.load_resources(list)),
            )
            .await;
        });
        *self.prefetch.lock() = Some(handle);
    }

    /// Apply `f` to the loaded roadmap if it is still `roadmap`.
    fn with_active(&self, roadmap: &RoadmapId, f: impl FnOnce(&mut ActiveRoadmap)) {
        let applied = match self.state.write().active.as_mut() {
            Some(active) if &active.roadmap.id == roadmap => {
                f(active);
                true
            }
            _ => false,
        };
        if applied {
            self.notifier.emit(StoreEvent::GraphChanged);
        }
    }
}
