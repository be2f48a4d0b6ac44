//! One-stop wiring of the state layer around a gateway, a storage transport
//! and a session.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::broadcast;

use crate::auth::Authenticator;
use crate::backend::{Backend, Gateway, HttpGateway, ObjectStorage};
use crate::config::ClientConfig;
use crate::session::{Session, SessionFile};
use crate::store::*;

pub struct RoadmapClient {
    session: Session,
    auth: Authenticator,
    notifier: Notifier,
    roadmaps: Arc<RoadmapManager>,
    resources: Arc<ResourceListEngine>,
    completions: Arc<CompletionCache>,
    content: Arc<ContentCache>,
    sharing: Arc<SharingView>,
}

impl RoadmapClient {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        storage: Arc<dyn ObjectStorage>,
        session: Session,
        session_file: Option<SessionFile>,
    ) -> Self {
        let backend = Backend::new(gateway);
        let notifier = Notifier::new();

        let completions = Arc::new(CompletionCache::new(
            backend.clone(),
            session.clone(),
            notifier.clone(),
        ));
        let resources = Arc::new(ResourceListEngine::new(
            backend.clone(),
            Arc::clone(&completions),
            notifier.clone(),
        ));
        let content = Arc::new(ContentCache::new(
            backend.clone(),
            storage,
            session.clone(),
            notifier.clone(),
        ));
        let sharing = Arc::new(SharingView::new(backend.clone(), notifier.clone()));
        let roadmaps = Arc::new(RoadmapManager::new(
            backend.clone(),
            session.clone(),
            Arc::clone(&resources),
            Arc::clone(&sharing),
            notifier.clone(),
        ));
        let auth = Authenticator::new(backend, session.clone(), session_file);

        Self {
            session,
            auth,
            notifier,
            roadmaps,
            resources,
            completions,
            content,
            sharing,
        }
    }

    /// Build an HTTP-backed client and restore any persisted session.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let http = Arc::new(
            HttpGateway::from_config(config).context("Failed to build HTTP client")?,
        );
        let client = Self::new(
            http.clone(),
            http,
            Session::new(),
            config.session_path.clone().map(SessionFile::new),
        );
        client.auth.restore();
        Ok(client)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn auth(&self) -> &Authenticator {
        &self.auth
    }

    pub fn roadmaps(&self) -> &RoadmapManager {
        &self.roadmaps
    }

    pub fn resources(&self) -> &ResourceListEngine {
        &self.resources
    }

    pub fn completions(&self) -> &CompletionCache {
        &self.completions
    }

    pub fn content(&self) -> &ContentCache {
        &self.content
    }

    pub fn sharing(&self) -> &SharingView {
        &self.sharing
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.notifier.subscribe()
    }

    /// Sign out and drop every cache and the loaded roadmap.
    pub async fn logout(&self) {
        self.auth.logout().await;
        self.roadmaps.reset();
        self.resources.clear();
        self.completions.clear();
        self.content.clear();
        self.sharing.clear();
    }
}
