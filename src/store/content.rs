use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{Notifier, StoreEvent};
use crate::backend::{Backend, ObjectStorage, StorageError};
use crate::error::{Result, SyncError};
use crate::models::{content_filename, ResourceId, UploadedFile, UserId};
use crate::session::Session;

/// Content type every resource file is uploaded with. The storage layer signs
/// upload URLs for exactly this value and answers 403 to anything else.
pub const CONTENT_TYPE: &str = "text/markdown; charset=UTF-8";

/// Free-text content of resources, stored as one file per resource.
///
/// A cached empty string means "no content yet"; an absent entry means
/// "not fetched".
pub struct ContentCache {
    backend: Backend,
    storage: Arc<dyn ObjectStorage>,
    session: Session,
    notifier: Notifier,
    contents: RwLock<HashMap<ResourceId, String>>,
}

impl ContentCache {
    pub fn new(
        backend: Backend,
        storage: Arc<dyn ObjectStorage>,
        session: Session,
        notifier: Notifier,
    ) -> Self {
        Self {
            backend,
            storage,
            session,
            notifier,
            contents: RwLock::new(HashMap::new()),
        }
    }

    pub fn cached_content(&self, resource: &ResourceId) -> Option<String> {
        self.contents.read().get(resource).cloned()
    }

    pub async fn load_content(&self, resource: &ResourceId) -> Result<String> {
        if let Some(content) = self.cached_content(resource) {
            tracing::debug!(%resource, "content cache hit");
            return Ok(content);
        }

        let user = self.session.require_user()?;
        let Some(file) = self.find_file(&user, resource).await? else {
            self.contents.write().insert(resource.clone(), String::new());
            self.notifier.emit(StoreEvent::ContentChanged(resource.clone()));
            return Ok(String::new());
        };

        let url = self.backend.download_url(&file.file).await?;
        let content = self
            .storage
            .download(&url)
            .await
            .map_err(|e| SyncError::remote(format!("Failed to download content: {}", e)))?;

        self.contents
            .write()
            .insert(resource.clone(), content.clone());
        self.notifier.emit(StoreEvent::ContentChanged(resource.clone()));
        Ok(content)
    }

    /// Replace the stored content of `resource`.
    ///
    /// Any existing file is deleted first, then a new one is uploaded and
    /// confirmed. The cache is only touched once every step succeeded.
    pub async fn save_content(&self, resource: &ResourceId, content: &str) -> Result<()> {
        let user = self.session.require_user()?;

        if let Some(existing) = self.find_file(&user, resource).await? {
            self.backend.delete_file(&existing.file).await?;
        }

        let filename = content_filename(resource);
        let ticket = self.backend.request_upload_url(&user, &filename).await?;

        self.storage
            .upload(&ticket.upload_url, content, CONTENT_TYPE)
            .await
            .map_err(upload_error)?;

        self.backend.confirm_upload(&ticket.file).await?;

        self.contents
            .write()
            .insert(resource.clone(), content.to_string());
        self.notifier
            .emit(StoreEvent::ContentChanged(resource.clone()));
        tracing::info!(%resource, bytes = content.len(), "saved content");
        Ok(())
    }

    pub fn clear(&self) {
        self.contents.write().clear();
    }

    async fn find_file(
        &self,
        user: &UserId,
        resource: &ResourceId,
    ) -> Result<Option<UploadedFile>> {
        let filename = content_filename(resource);
        let files = self.backend.files_by_owner(user).await?;
        Ok(files.into_iter().find(|f| f.filename == filename))
    }
}

fn upload_error(e: StorageError) -> SyncError {
    match e {
        StorageError::Status { status: 403, reason } => SyncError::ContentTypeMismatch {
            status: 403,
            reason,
            expected: CONTENT_TYPE.to_string(),
        },
        other => SyncError::remote(format!("Failed to upload content: {}", other)),
    }
}
