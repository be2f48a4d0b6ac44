//! In-memory stand-in for the roadmap backend and its object storage.
//!
//! Emulates every concept call the client issues, records each call as
//! `Concept.action`, and lets tests inject failures or delays per call.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use roadmap_sync::backend::{Gateway, GatewayError, ObjectStorage, StorageError};
use roadmap_sync::models::*;
use roadmap_sync::store::{reorder_in_place, CONTENT_TYPE};
use roadmap_sync::{RoadmapClient, Session};

struct StoredList {
    owner: UserId,
    title: String,
    entries: Vec<IndexedResource>,
}

struct StoredFile {
    owner: UserId,
    file: FileId,
    filename: String,
    confirmed: bool,
}

#[derive(Default)]
struct World {
    next_id: u64,
    users: Vec<(UserId, String, String)>,
    sessions: Vec<SessionToken>,
    roadmaps: Vec<AssignedObject>,
    graphs: HashMap<GraphId, UserId>,
    nodes: Vec<Node>,
    edges: Vec<(GraphId, Edge)>,
    lists: HashMap<ResourceListId, StoredList>,
    checks: Vec<Check>,
    files: Vec<StoredFile>,
    blobs: HashMap<FileId, String>,
    shares: Vec<(GraphId, UserId)>,
}

impl World {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

struct Delay {
    call: String,
    arg: Option<String>,
    duration: Duration,
}

#[derive(Default)]
pub struct FakeBackend {
    world: Mutex<World>,
    calls: Mutex<Vec<(String, Value)>>,
    failures: Mutex<HashMap<String, String>>,
    delays: Mutex<Vec<Delay>>,
    signed_content_type: Mutex<Option<String>>,
}

fn text(body: &Value, key: &str) -> String {
    body.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn number(body: &Value, key: &str) -> usize {
    body.get(key).and_then(Value::as_u64).unwrap_or_default() as usize
}

fn rows<T: serde::Serialize>(items: impl IntoIterator<Item = T>) -> Value {
    Value::Array(
        items
            .into_iter()
            .map(|item| serde_json::to_value(item).unwrap_or(Value::Null))
            .collect(),
    )
}

fn upload_url(file: &FileId) -> String {
    format!("https://storage.test/upload/{}", file)
}

fn download_url(file: &FileId) -> String {
    format!("https://storage.test/download/{}", file)
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    // ============================================================
    // Fault injection
    // ============================================================

    /// Make every `call` (e.g. `"EnrichedDAG.addNode"` or
    /// `"Storage.upload"`) fail with `message` until [`FakeBackend::heal`].
    pub fn fail(&self, call: &str, message: &str) {
        self.failures
            .lock()
            .insert(call.to_string(), message.to_string());
    }

    pub fn heal(&self, call: &str) {
        self.failures.lock().remove(call);
    }

    /// Hold every `call` whose body mentions `arg` for `duration`.
    pub fn delay(&self, call: &str, arg: Option<&str>, duration: Duration) {
        self.delays.lock().push(Delay {
            call: call.to_string(),
            arg: arg.map(str::to_string),
            duration,
        });
    }

    /// Storage answers 403 to uploads not carrying this content type.
    pub fn sign_uploads_for(&self, content_type: &str) {
        *self.signed_content_type.lock() = Some(content_type.to_string());
    }

    // ============================================================
    // Call inspection
    // ============================================================

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(c, _)| c.clone()).collect()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().iter().filter(|(c, _)| c == call).count()
    }

    pub fn bodies(&self, call: &str) -> Vec<Value> {
        self.calls
            .lock()
            .iter()
            .filter(|(c, _)| c == call)
            .map(|(_, body)| body.clone())
            .collect()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().clear();
    }

    // ============================================================
    // Seeding
    // ============================================================

    pub fn add_user(&self, username: &str, password: &str) -> UserId {
        let mut world = self.world.lock();
        let id = UserId::new(world.id("user"));
        world
            .users
            .push((id.clone(), username.to_string(), password.to_string()));
        id
    }

    pub fn seed_roadmap(&self, owner: &UserId, title: &str) -> AssignedObject {
        let mut world = self.world.lock();
        let graph = GraphId::new(world.id("graph"));
        world.graphs.insert(graph.clone(), owner.clone());
        let roadmap = AssignedObject {
            id: RoadmapId::new(world.id("roadmap")),
            owner: owner.clone(),
            object: graph,
            title: title.to_string(),
            description: String::new(),
        };
        world.roadmaps.push(roadmap.clone());
        roadmap
    }

    pub fn seed_node(&self, roadmap: &AssignedObject, title: &str) -> Node {
        let mut world = self.world.lock();
        let list = ResourceListId::new(world.id("list"));
        world.lists.insert(
            list.clone(),
            StoredList {
                owner: roadmap.owner.clone(),
                title: format!("{} / {}", roadmap.title, title),
                entries: Vec::new(),
            },
        );
        let node = Node {
            id: NodeId::new(world.id("node")),
            parent: roadmap.object.clone(),
            title: title.to_string(),
            enrichment: list,
            position: None,
        };
        world.nodes.push(node.clone());
        node
    }

    pub fn seed_edge(&self, roadmap: &AssignedObject, source: &Node, target: &Node) -> Edge {
        let mut world = self.world.lock();
        let edge = Edge {
            id: EdgeId::new(world.id("edge")),
            source: source.id.clone(),
            target: target.id.clone(),
            enrichment: source.enrichment.clone(),
        };
        world.edges.push((roadmap.object.clone(), edge.clone()));
        edge
    }

    pub fn seed_resources(&self, list: &ResourceListId, titles: &[&str]) -> Vec<IndexedResource> {
        let mut world = self.world.lock();
        let mut created = Vec::new();
        for title in titles {
            let id = IndexedResourceId::new(world.id("entry"));
            let resource = ResourceId::new(world.id("resource"));
            let Some(stored) = world.lists.get_mut(list) else {
                break;
            };
            let entry = IndexedResource {
                id,
                resource,
                title: title.to_string(),
                list: list.clone(),
                index: stored.entries.len(),
            };
            stored.entries.push(entry.clone());
            created.push(entry);
        }
        created
    }

    pub fn seed_check(&self, user: &UserId, resource: &ResourceId, checked: bool) -> Check {
        let mut world = self.world.lock();
        let check = Check {
            id: CheckId::new(world.id("check")),
            user: user.clone(),
            object: resource.clone(),
            checked,
        };
        world.checks.push(check.clone());
        check
    }

    pub fn seed_content(&self, owner: &UserId, resource: &ResourceId, content: &str) -> FileId {
        let mut world = self.world.lock();
        let file = FileId::new(world.id("file"));
        world.files.push(StoredFile {
            owner: owner.clone(),
            file: file.clone(),
            filename: content_filename(resource),
            confirmed: true,
        });
        world.blobs.insert(file.clone(), content.to_string());
        file
    }

    pub fn seed_share(&self, graph: &GraphId, with: &UserId) {
        self.world.lock().shares.push((graph.clone(), with.clone()));
    }

    // ============================================================
    // Backend state inspection
    // ============================================================

    pub fn node_titles(&self, graph: &GraphId) -> Vec<String> {
        self.world
            .lock()
            .nodes
            .iter()
            .filter(|n| &n.parent == graph)
            .map(|n| n.title.clone())
            .collect()
    }

    pub fn edge_count(&self, graph: &GraphId) -> usize {
        self.world
            .lock()
            .edges
            .iter()
            .filter(|(g, _)| g == graph)
            .count()
    }

    pub fn list_titles(&self, list: &ResourceListId) -> Vec<String> {
        self.world
            .lock()
            .lists
            .get(list)
            .map(|l| l.entries.iter().map(|e| e.title.clone()).collect())
            .unwrap_or_default()
    }

    pub fn list_exists(&self, list: &ResourceListId) -> bool {
        self.world.lock().lists.contains_key(list)
    }

    pub fn graph_exists(&self, graph: &GraphId) -> bool {
        self.world.lock().graphs.contains_key(graph)
    }

    pub fn roadmap_titles(&self, owner: &UserId) -> Vec<String> {
        self.world
            .lock()
            .roadmaps
            .iter()
            .filter(|r| &r.owner == owner)
            .map(|r| r.title.clone())
            .collect()
    }

    pub fn checks_for(&self, user: &UserId) -> Vec<Check> {
        self.world
            .lock()
            .checks
            .iter()
            .filter(|c| &c.user == user)
            .cloned()
            .collect()
    }

    pub fn file_names(&self, owner: &UserId) -> Vec<String> {
        self.world
            .lock()
            .files
            .iter()
            .filter(|f| &f.owner == owner)
            .map(|f| f.filename.clone())
            .collect()
    }

    pub fn shares(&self) -> Vec<(GraphId, UserId)> {
        self.world.lock().shares.clone()
    }

    pub fn session_count(&self) -> usize {
        self.world.lock().sessions.len()
    }

    // ============================================================
    // Dispatch
    // ============================================================

    /// Record the call, then apply any injected delay or failure.
    async fn intercept(&self, call: &str, body: &Value) -> Result<(), String> {
        self.calls.lock().push((call.to_string(), body.clone()));

        let delay = self
            .delays
            .lock()
            .iter()
            .find(|d| {
                d.call == call
                    && d.arg.as_ref().map_or(true, |arg| {
                        body.as_object()
                            .is_some_and(|o| o.values().any(|v| v.as_str() == Some(arg.as_str())))
                    })
            })
            .map(|d| d.duration);
        if let Some(duration) = delay {
            tokio::time::sleep(duration).await;
        }

        match self.failures.lock().get(call) {
            Some(message) => Err(message.clone()),
            None => Ok(()),
        }
    }

    fn handle(&self, concept: &str, action: &str, body: &Value) -> Result<Value, String> {
        let mut world = self.world.lock();
        let w = &mut *world;

        match (concept, action) {
            // ObjectManager
            ("ObjectManager", "_getUserAssignedObjects") => {
                let owner = UserId::new(text(body, "owner"));
                Ok(rows(w.roadmaps.iter().filter(|r| r.owner == owner)))
            }
            ("ObjectManager", "_getAssignedObjectsByObject") => {
                let graph = GraphId::new(text(body, "object"));
                Ok(rows(w.roadmaps.iter().filter(|r| r.object == graph)))
            }
            ("ObjectManager", "createAssignedObject") => {
                let roadmap = AssignedObject {
                    id: RoadmapId::new(w.id("roadmap")),
                    owner: UserId::new(text(body, "owner")),
                    object: GraphId::new(text(body, "object")),
                    title: text(body, "title"),
                    description: text(body, "description"),
                };
                let id = roadmap.id.clone();
                w.roadmaps.push(roadmap);
                Ok(json!({ "assignedObject": id }))
            }
            ("ObjectManager", "deleteAssignedObject") => {
                let id = RoadmapId::new(text(body, "assignedObject"));
                w.roadmaps.retain(|r| r.id != id);
                Ok(json!({}))
            }

            // EnrichedDAG
            ("EnrichedDAG", "createEmptyGraph") => {
                let graph = GraphId::new(w.id("graph"));
                w.graphs
                    .insert(graph.clone(), UserId::new(text(body, "owner")));
                Ok(json!({ "newGraph": graph }))
            }
            ("EnrichedDAG", "deleteGraph") => {
                let graph = GraphId::new(text(body, "graph"));
                if w.graphs.remove(&graph).is_none() {
                    return Err("Graph not found".to_string());
                }
                w.nodes.retain(|n| n.parent != graph);
                w.edges.retain(|(g, _)| g != &graph);
                Ok(json!({}))
            }
            ("EnrichedDAG", "_getGraphNodes") => {
                let graph = GraphId::new(text(body, "graph"));
                Ok(rows(w.nodes.iter().filter(|n| n.parent == graph)))
            }
            ("EnrichedDAG", "_getGraphEdges") => {
                let graph = GraphId::new(text(body, "graph"));
                Ok(rows(
                    w.edges.iter().filter(|(g, _)| g == &graph).map(|(_, e)| e),
                ))
            }
            ("EnrichedDAG", "addNode") => {
                let graph = GraphId::new(text(body, "graph"));
                let title = text(body, "nodeTitle");
                if w.nodes.iter().any(|n| n.parent == graph && n.title == title) {
                    return Err("Node title already exists".to_string());
                }
                let node = Node {
                    id: NodeId::new(w.id("node")),
                    parent: graph,
                    title,
                    enrichment: ResourceListId::new(text(body, "enrichment")),
                    position: None,
                };
                let id = node.id.clone();
                w.nodes.push(node);
                Ok(json!({ "newNode": id }))
            }
            ("EnrichedDAG", "changeNodeTitle") => {
                let id = NodeId::new(text(body, "node"));
                let node = w
                    .nodes
                    .iter_mut()
                    .find(|n| n.id == id)
                    .ok_or("Node not found")?;
                node.title = text(body, "newNodeTitle");
                Ok(json!({}))
            }
            ("EnrichedDAG", "removeNode") => {
                let id = NodeId::new(text(body, "node"));
                if !w.nodes.iter().any(|n| n.id == id) {
                    return Err("Node not found".to_string());
                }
                w.nodes.retain(|n| n.id != id);
                w.edges.retain(|(_, e)| !e.touches(&id));
                Ok(json!({}))
            }
            ("EnrichedDAG", "addEdge") => {
                let edge = Edge {
                    id: EdgeId::new(w.id("edge")),
                    source: NodeId::new(text(body, "sourceNode")),
                    target: NodeId::new(text(body, "targetNode")),
                    enrichment: ResourceListId::new(text(body, "enrichment")),
                };
                let id = edge.id.clone();
                w.edges.push((GraphId::new(text(body, "graph")), edge));
                Ok(json!({ "newEdge": id }))
            }
            ("EnrichedDAG", "removeEdge") => {
                let id = EdgeId::new(text(body, "edge"));
                w.edges.retain(|(_, e)| e.id != id);
                Ok(json!({}))
            }

            // ResourceList
            ("ResourceList", "createResourceList") => {
                let owner = UserId::new(text(body, "owner"));
                let title = text(body, "listTitle");
                if w
                    .lists
                    .values()
                    .any(|l| l.owner == owner && l.title == title)
                {
                    return Err("Resource list title already exists".to_string());
                }
                let id = ResourceListId::new(w.id("list"));
                w.lists.insert(
                    id.clone(),
                    StoredList {
                        owner,
                        title,
                        entries: Vec::new(),
                    },
                );
                Ok(json!({ "newResourceList": id }))
            }
            ("ResourceList", "deleteResourceList") => {
                let id = ResourceListId::new(text(body, "resourceList"));
                w.lists.remove(&id).ok_or("Resource list not found")?;
                Ok(json!({}))
            }
            ("ResourceList", "_getListResources") => {
                let id = ResourceListId::new(text(body, "resourceList"));
                let list = w.lists.get(&id).ok_or("Resource list not found")?;
                Ok(rows(list.entries.iter()))
            }
            ("ResourceList", "appendResource") => {
                let id = ResourceListId::new(text(body, "resourceList"));
                let entry_id = IndexedResourceId::new(w.id("entry"));
                let list = w.lists.get_mut(&id).ok_or("Resource list not found")?;
                let entry = IndexedResource {
                    id: entry_id.clone(),
                    resource: ResourceId::new(text(body, "resource")),
                    title: text(body, "resourceTitle"),
                    list: id,
                    index: list.entries.len(),
                };
                list.entries.push(entry);
                Ok(json!({ "newIndexedResource": entry_id }))
            }
            ("ResourceList", "deleteResource") => {
                let id = ResourceListId::new(text(body, "resourceList"));
                let index = number(body, "index");
                let list = w.lists.get_mut(&id).ok_or("Resource list not found")?;
                if index >= list.entries.len() {
                    return Err("Index out of range".to_string());
                }
                list.entries.remove(index);
                for (position, entry) in list.entries.iter_mut().enumerate() {
                    entry.index = position;
                }
                Ok(json!({}))
            }
            ("ResourceList", "moveResource") => {
                let id = ResourceListId::new(text(body, "resourceList"));
                let list = w.lists.get_mut(&id).ok_or("Resource list not found")?;
                reorder_in_place(
                    &mut list.entries,
                    number(body, "oldIndex"),
                    number(body, "newIndex"),
                )
                .map_err(|e| e.to_string())?;
                Ok(json!({}))
            }

            // Checking
            ("Checking", "_getCheck") => {
                let user = UserId::new(text(body, "user"));
                let object = ResourceId::new(text(body, "object"));
                Ok(rows(
                    w.checks
                        .iter()
                        .filter(|c| c.user == user && c.object == object),
                ))
            }
            ("Checking", "createCheck") => {
                let user = UserId::new(text(body, "user"));
                let object = ResourceId::new(text(body, "object"));
                if w.checks.iter().any(|c| c.user == user && c.object == object) {
                    return Err("Check already exists".to_string());
                }
                let check = Check {
                    id: CheckId::new(w.id("check")),
                    user,
                    object,
                    checked: false,
                };
                let id = check.id.clone();
                w.checks.push(check);
                Ok(json!({ "check": id }))
            }
            ("Checking", "markChecked") | ("Checking", "unmarkChecked") => {
                let id = CheckId::new(text(body, "check"));
                let check = w
                    .checks
                    .iter_mut()
                    .find(|c| c.id == id)
                    .ok_or("Check not found")?;
                check.checked = action == "markChecked";
                Ok(json!({}))
            }

            // FileUploading
            ("FileUploading", "_getFilesByOwner") => {
                let owner = UserId::new(text(body, "owner"));
                Ok(rows(
                    w.files
                        .iter()
                        .filter(|f| f.owner == owner && f.confirmed)
                        .map(|f| json!({ "file": f.file, "filename": f.filename })),
                ))
            }
            ("FileUploading", "requestUploadURL") => {
                let file = FileId::new(w.id("file"));
                w.files.push(StoredFile {
                    owner: UserId::new(text(body, "owner")),
                    file: file.clone(),
                    filename: text(body, "filename"),
                    confirmed: false,
                });
                Ok(json!({ "file": file, "uploadURL": upload_url(&file) }))
            }
            ("FileUploading", "confirmUpload") => {
                let id = FileId::new(text(body, "file"));
                let file = w
                    .files
                    .iter_mut()
                    .find(|f| f.file == id)
                    .ok_or("File not found")?;
                file.confirmed = true;
                Ok(json!({ "file": id }))
            }
            ("FileUploading", "_getDownloadURL") => {
                let id = FileId::new(text(body, "file"));
                if !w.files.iter().any(|f| f.file == id) {
                    return Err("File not found".to_string());
                }
                Ok(json!([{ "downloadURL": download_url(&id) }]))
            }
            ("FileUploading", "delete") => {
                let id = FileId::new(text(body, "file"));
                w.files.retain(|f| f.file != id);
                w.blobs.remove(&id);
                Ok(json!({}))
            }

            // UserAuthentication
            ("UserAuthentication", "_getUserByUsername") => {
                let username = text(body, "username");
                Ok(rows(
                    w.users
                        .iter()
                        .filter(|(_, name, _)| name == &username)
                        .map(|(id, _, _)| json!({ "user": id })),
                ))
            }
            ("UserAuthentication", "_getUsername") => {
                let user = UserId::new(text(body, "user"));
                Ok(rows(
                    w.users
                        .iter()
                        .filter(|(id, _, _)| id == &user)
                        .map(|(_, name, _)| json!({ "username": name })),
                ))
            }
            ("UserAuthentication", "login") => {
                let username = text(body, "username");
                let password = text(body, "password");
                w.users
                    .iter()
                    .find(|(_, name, pass)| name == &username && pass == &password)
                    .map(|(id, _, _)| json!({ "user": id }))
                    .ok_or_else(|| "Invalid username or password".to_string())
            }
            ("UserAuthentication", "register") => {
                let username = text(body, "username");
                if w.users.iter().any(|(_, name, _)| name == &username) {
                    return Err("Username already exists".to_string());
                }
                let id = UserId::new(w.id("user"));
                w.users
                    .push((id.clone(), username, text(body, "password")));
                Ok(json!({ "user": id }))
            }

            // Sessioning
            ("Sessioning", "create") => {
                let token = SessionToken::new(w.id("session"));
                w.sessions.push(token.clone());
                Ok(json!({ "session": token }))
            }
            ("Sessioning", "delete") => {
                let token = SessionToken::new(text(body, "session"));
                w.sessions.retain(|s| s != &token);
                Ok(json!({}))
            }

            // Sharing
            ("Sharing", "share") => {
                w.shares.push((
                    GraphId::new(text(body, "object")),
                    UserId::new(text(body, "sharedWith")),
                ));
                Ok(json!({}))
            }
            ("Sharing", "_getSharedWithUser") => {
                let user = UserId::new(text(body, "user"));
                Ok(rows(
                    w.shares
                        .iter()
                        .filter(|(_, with)| with == &user)
                        .map(|(graph, _)| json!({ "object": graph })),
                ))
            }

            _ => Err(format!("Unknown call {}.{}", concept, action)),
        }
    }
}

#[async_trait]
impl Gateway for FakeBackend {
    async fn invoke_action(
        &self,
        concept: &str,
        action: &str,
        body: Value,
    ) -> Result<Value, GatewayError> {
        let call = format!("{}.{}", concept, action);
        self.intercept(&call, &body)
            .await
            .map_err(GatewayError::Remote)?;
        self.handle(concept, action, &body)
            .map_err(GatewayError::Remote)
    }

    async fn invoke_query(
        &self,
        concept: &str,
        query: &str,
        body: Value,
    ) -> Result<Vec<Value>, GatewayError> {
        let call = format!("{}.{}", concept, query);
        self.intercept(&call, &body)
            .await
            .map_err(GatewayError::Remote)?;
        match self.handle(concept, query, &body) {
            Ok(Value::Array(rows)) => Ok(rows),
            Ok(_) => Err(GatewayError::Decode(
                "query response is not a list".to_string(),
            )),
            Err(message) => Err(GatewayError::Remote(message)),
        }
    }
}

#[async_trait]
impl ObjectStorage for FakeBackend {
    async fn upload(
        &self,
        url: &str,
        content: &str,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let body = json!({ "url": url, "contentType": content_type });
        self.intercept("Storage.upload", &body)
            .await
            .map_err(StorageError::Transport)?;

        let signed = self
            .signed_content_type
            .lock()
            .clone()
            .unwrap_or_else(|| CONTENT_TYPE.to_string());
        if content_type != signed {
            return Err(StorageError::Status {
                status: 403,
                reason: "Forbidden".to_string(),
            });
        }

        let mut world = self.world.lock();
        let file = world
            .files
            .iter()
            .find(|f| upload_url(&f.file) == url)
            .map(|f| f.file.clone())
            .ok_or_else(|| StorageError::Status {
                status: 404,
                reason: "Not Found".to_string(),
            })?;
        world.blobs.insert(file, content.to_string());
        Ok(())
    }

    async fn download(&self, url: &str) -> Result<String, StorageError> {
        let body = json!({ "url": url });
        self.intercept("Storage.download", &body)
            .await
            .map_err(StorageError::Transport)?;

        let world = self.world.lock();
        world
            .blobs
            .iter()
            .find(|(file, _)| download_url(file) == url)
            .map(|(_, content)| content.clone())
            .ok_or_else(|| StorageError::Status {
                status: 404,
                reason: "Not Found".to_string(),
            })
    }
}

// ============================================================
// Test setup
// ============================================================

/// A client wired to `fake`, with nobody signed in.
pub fn client_for(fake: &Arc<FakeBackend>) -> RoadmapClient {
    RoadmapClient::new(fake.clone(), fake.clone(), Session::new(), None)
}

/// A client wired to `fake` and logged in as a freshly added user.
pub async fn signed_in(fake: &Arc<FakeBackend>, username: &str) -> (RoadmapClient, UserId) {
    fake.add_user(username, "secret");
    let client = client_for(fake);
    let user = client
        .auth()
        .login(username, "secret")
        .await
        .expect("login failed");
    (client, user)
}

pub struct Fixture {
    pub fake: Arc<FakeBackend>,
    pub client: RoadmapClient,
    pub user: UserId,
}

pub async fn setup() -> Fixture {
    let fake = FakeBackend::new();
    let (client, user) = signed_in(&fake, "alice").await;
    Fixture { fake, client, user }
}

impl Fixture {
    /// Seed a roadmap for the signed-in user and load it.
    pub async fn open_roadmap(&self, title: &str) -> AssignedObject {
        let roadmap = self.fake.seed_roadmap(&self.user, title);
        self.client
            .roadmaps()
            .list_own_roadmaps()
            .await
            .expect("list failed");
        self.client
            .roadmaps()
            .load_roadmap(&roadmap.id)
            .await
            .expect("load failed");
        self.client.roadmaps().wait_for_prefetch().await;
        roadmap
    }
}
