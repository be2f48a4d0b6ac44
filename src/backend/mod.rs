//! Typed access to the roadmap backend.
//!
//! [`Backend`] turns the untyped [`Gateway`] primitives into one method per
//! concept call the state layer issues, decoding payloads into
//! [`crate::models`] types.

mod gateway;
mod http;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

pub use gateway::{Gateway, GatewayError, ObjectStorage, StorageError};
pub use http::HttpGateway;

use crate::error::{Result, SyncError};
use crate::models::*;

const OBJECTS: &str = "ObjectManager";
const DAG: &str = "EnrichedDAG";
const LISTS: &str = "ResourceList";
const CHECKS: &str = "Checking";
const FILES: &str = "FileUploading";
const USERS: &str = "UserAuthentication";
const SESSIONS: &str = "Sessioning";
const SHARING: &str = "Sharing";

#[derive(Deserialize)]
struct UserRow {
    user: UserId,
}

#[derive(Deserialize)]
struct UsernameRow {
    username: String,
}

#[derive(Deserialize)]
struct DownloadUrlRow {
    #[serde(rename = "downloadURL")]
    download_url: String,
}

/// Typed client for every backend call the state layer makes.
#[derive(Clone)]
pub struct Backend {
    gateway: Arc<dyn Gateway>,
}

impl Backend {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    async fn action(&self, concept: &str, action: &str, body: Value) -> Result<Value> {
        tracing::debug!(concept, action, "invoking action");
        Ok(self.gateway.invoke_action(concept, action, body).await?)
    }

    /// Invoke an action and pull one field out of its payload. A missing or
    /// malformed field is reported with `missing`.
    async fn action_field<T: DeserializeOwned>(
        &self,
        concept: &str,
        action: &str,
        body: Value,
        field: &str,
        missing: &str,
    ) -> Result<T> {
        let data = self.action(concept, action, body).await?;
        data.get(field)
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .ok_or_else(|| SyncError::remote(missing))
    }

    async fn query<T: DeserializeOwned>(
        &self,
        concept: &str,
        query: &str,
        body: Value,
    ) -> Result<Vec<T>> {
        tracing::debug!(concept, query, "invoking query");
        let rows = self.gateway.invoke_query(concept, query, body).await?;
        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| {
                    SyncError::remote(format!("Unexpected {}.{} row: {}", concept, query, e))
                })
            })
            .collect()
    }

    // ============================================================
    // Roadmap Operations
    // ============================================================

    pub async fn user_roadmaps(&self, owner: &UserId) -> Result<Vec<AssignedObject>> {
        self.query(OBJECTS, "_getUserAssignedObjects", json!({ "owner": owner }))
            .await
    }

    /// Find the roadmap handle(s) referencing a graph.
    pub async fn roadmaps_for_graph(&self, graph: &GraphId) -> Result<Vec<AssignedObject>> {
        self.query(OBJECTS, "_getAssignedObjectsByObject", json!({ "object": graph }))
            .await
    }

    pub async fn create_empty_graph(&self, owner: &UserId, title: &str) -> Result<GraphId> {
        self.action_field(
            DAG,
            "createEmptyGraph",
            json!({ "owner": owner, "graphTitle": title }),
            "newGraph",
            "Failed to create graph",
        )
        .await
    }

    pub async fn create_assigned_object(
        &self,
        owner: &UserId,
        graph: &GraphId,
        title: &str,
        description: &str,
    ) -> Result<RoadmapId> {
        self.action_field(
            OBJECTS,
            "createAssignedObject",
            json!({
                "owner": owner,
                "object": graph,
                "title": title,
                "description": description,
            }),
            "assignedObject",
            "Failed to create assigned object",
        )
        .await
    }

    pub async fn delete_graph(&self, graph: &GraphId) -> Result<()> {
        self.action(DAG, "deleteGraph", json!({ "graph": graph }))
            .await
            .map(|_| ())
    }

    pub async fn delete_assigned_object(&self, id: &RoadmapId) -> Result<()> {
        self.action(OBJECTS, "deleteAssignedObject", json!({ "assignedObject": id }))
            .await
            .map(|_| ())
    }

    // ============================================================
    // Graph Operations
    // ============================================================

    pub async fn graph_nodes(&self, graph: &GraphId) -> Result<Vec<Node>> {
        self.query(DAG, "_getGraphNodes", json!({ "graph": graph }))
            .await
    }

    pub async fn graph_edges(&self, graph: &GraphId) -> Result<Vec<Edge>> {
        self.query(DAG, "_getGraphEdges", json!({ "graph": graph }))
            .await
    }

    pub async fn add_node(
        &self,
        graph: &GraphId,
        title: &str,
        enrichment: &ResourceListId,
    ) -> Result<NodeId> {
        self.action_field(
            DAG,
            "addNode",
            json!({ "graph": graph, "nodeTitle": title, "enrichment": enrichment }),
            "newNode",
            "Failed to create node",
        )
        .await
    }

    pub async fn change_node_title(
        &self,
        graph: &GraphId,
        node: &NodeId,
        title: &str,
    ) -> Result<()> {
        self.action(
            DAG,
            "changeNodeTitle",
            json!({ "graph": graph, "node": node, "newNodeTitle": title }),
        )
        .await
        .map(|_| ())
    }

    pub async fn remove_node(&self, node: &NodeId) -> Result<()> {
        self.action(DAG, "removeNode", json!({ "node": node }))
            .await
            .map(|_| ())
    }

    pub async fn add_edge(
        &self,
        graph: &GraphId,
        source: &NodeId,
        target: &NodeId,
        enrichment: &ResourceListId,
    ) -> Result<EdgeId> {
        self.action_field(
            DAG,
            "addEdge",
            json!({
                "graph": graph,
                "sourceNode": source,
                "targetNode": target,
                "enrichment": enrichment,
            }),
            "newEdge",
            "Failed to create edge",
        )
        .await
    }

    pub async fn remove_edge(&self, edge: &EdgeId) -> Result<()> {
        self.action(DAG, "removeEdge", json!({ "edge": edge }))
            .await
            .map(|_| ())
    }

    // ============================================================
    // Resource List Operations
    // ============================================================

    pub async fn create_resource_list(
        &self,
        owner: &UserId,
        title: &str,
    ) -> Result<ResourceListId> {
        self.action_field(
            LISTS,
            "createResourceList",
            json!({ "owner": owner, "listTitle": title }),
            "newResourceList",
            "Failed to create resource list",
        )
        .await
    }

    pub async fn delete_resource_list(&self, list: &ResourceListId) -> Result<()> {
        self.action(LISTS, "deleteResourceList", json!({ "resourceList": list }))
            .await
            .map(|_| ())
    }

    pub async fn list_resources(&self, list: &ResourceListId) -> Result<Vec<IndexedResource>> {
        self.query(LISTS, "_getListResources", json!({ "resourceList": list }))
            .await
    }

    pub async fn append_resource(
        &self,
        list: &ResourceListId,
        resource: &ResourceId,
        title: &str,
    ) -> Result<IndexedResourceId> {
        self.action_field(
            LISTS,
            "appendResource",
            json!({ "resourceList": list, "resource": resource, "resourceTitle": title }),
            "newIndexedResource",
            "Failed to add resource",
        )
        .await
    }

    pub async fn delete_resource(&self, list: &ResourceListId, index: usize) -> Result<()> {
        self.action(
            LISTS,
            "deleteResource",
            json!({ "resourceList": list, "index": index }),
        )
        .await
        .map(|_| ())
    }

    pub async fn move_resource(&self, list: &ResourceListId, from: usize, to: usize) -> Result<()> {
        self.action(
            LISTS,
            "moveResource",
            json!({ "resourceList": list, "oldIndex": from, "newIndex": to }),
        )
        .await
        .map(|_| ())
    }

    // ============================================================
    // Check Operations
    // ============================================================

    pub async fn find_check(&self, user: &UserId, object: &ResourceId) -> Result<Option<Check>> {
        let checks: Vec<Check> = self
            .query(CHECKS, "_getCheck", json!({ "user": user, "object": object }))
            .await?;
        Ok(checks.into_iter().next())
    }

    pub async fn create_check(&self, user: &UserId, object: &ResourceId) -> Result<CheckId> {
        self.action_field(
            CHECKS,
            "createCheck",
            json!({ "user": user, "object": object }),
            "check",
            "Failed to create check",
        )
        .await
    }

    pub async fn mark_checked(&self, check: &CheckId) -> Result<()> {
        self.action(CHECKS, "markChecked", json!({ "check": check }))
            .await
            .map(|_| ())
    }

    pub async fn unmark_checked(&self, check: &CheckId) -> Result<()> {
        self.action(CHECKS, "unmarkChecked", json!({ "check": check }))
            .await
            .map(|_| ())
    }

    // ============================================================
    // File Operations
    // ============================================================

    pub async fn files_by_owner(&self, owner: &UserId) -> Result<Vec<UploadedFile>> {
        self.query(FILES, "_getFilesByOwner", json!({ "owner": owner }))
            .await
    }

    pub async fn request_upload_url(&self, owner: &UserId, filename: &str) -> Result<UploadTicket> {
        let data = self
            .action(
                FILES,
                "requestUploadURL",
                json!({ "owner": owner, "filename": filename }),
            )
            .await?;
        serde_json::from_value(data).map_err(|_| SyncError::remote("Failed to get upload URL"))
    }

    pub async fn confirm_upload(&self, file: &FileId) -> Result<()> {
        self.action(FILES, "confirmUpload", json!({ "file": file }))
            .await
            .map(|_| ())
    }

    pub async fn download_url(&self, file: &FileId) -> Result<String> {
        let rows: Vec<DownloadUrlRow> = self
            .query(FILES, "_getDownloadURL", json!({ "file": file }))
            .await?;
        rows.into_iter()
            .next()
            .map(|row| row.download_url)
            .ok_or_else(|| SyncError::remote("Failed to get download URL"))
    }

    pub async fn delete_file(&self, file: &FileId) -> Result<()> {
        self.action(FILES, "delete", json!({ "file": file }))
            .await
            .map(|_| ())
    }

    // ============================================================
    // User & Session Operations
    // ============================================================

    pub async fn user_by_username(&self, username: &str) -> Result<Option<UserId>> {
        let rows: Vec<UserRow> = self
            .query(USERS, "_getUserByUsername", json!({ "username": username }))
            .await?;
        Ok(rows.into_iter().next().map(|row| row.user))
    }

    pub async fn username(&self, user: &UserId) -> Result<Option<String>> {
        let rows: Vec<UsernameRow> = self
            .query(USERS, "_getUsername", json!({ "user": user }))
            .await?;
        Ok(rows.into_iter().next().map(|row| row.username))
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<UserId> {
        self.action_field(
            USERS,
            "login",
            json!({ "username": username, "password": password }),
            "user",
            "Login failed: No user returned",
        )
        .await
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<UserId> {
        self.action_field(
            USERS,
            "register",
            json!({ "username": username, "password": password }),
            "user",
            "Registration failed: No user returned",
        )
        .await
    }

    pub async fn create_session(&self, user: &UserId) -> Result<SessionToken> {
        self.action_field(
            SESSIONS,
            "create",
            json!({ "user": user }),
            "session",
            "Session creation failed",
        )
        .await
    }

    pub async fn delete_session(&self, session: &SessionToken) -> Result<()> {
        self.action(SESSIONS, "delete", json!({ "session": session }))
            .await
            .map(|_| ())
    }

    // ============================================================
    // Sharing Operations
    // ============================================================

    pub async fn share(&self, owner: &UserId, graph: &GraphId, with: &UserId) -> Result<()> {
        self.action(
            SHARING,
            "share",
            json!({ "owner": owner, "object": graph, "sharedWith": with }),
        )
        .await
        .map(|_| ())
    }

    pub async fn shared_with(&self, user: &UserId) -> Result<Vec<SharedFile>> {
        self.query(SHARING, "_getSharedWithUser", json!({ "user": user }))
            .await
    }
}
