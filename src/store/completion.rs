use std::collections::HashMap;

use parking_lot::RwLock;

use super::{Notifier, StoreEvent};
use crate::backend::Backend;
use crate::error::{Result, SyncError};
use crate::models::{Check, ResourceId};
use crate::session::Session;

/// Per-resource completion flags with get-or-create semantics.
///
/// Holds at most one check per resource. Entries are never invalidated by
/// list or content edits, only by [`CompletionCache::clear`] on logout.
pub struct CompletionCache {
    backend: Backend,
    session: Session,
    notifier: Notifier,
    checks: RwLock<HashMap<ResourceId, Check>>,
    toggles: tokio::sync::Mutex<()>,
}

impl CompletionCache {
    pub fn new(backend: Backend, session: Session, notifier: Notifier) -> Self {
        Self {
            backend,
            session,
            notifier,
            checks: RwLock::new(HashMap::new()),
            toggles: tokio::sync::Mutex::new(()),
        }
    }

    /// Cached state only; `None` if the check was never fetched.
    pub fn is_checked(&self, resource: &ResourceId) -> Option<bool> {
        self.checks.read().get(resource).map(|c| c.checked)
    }

    pub fn cached(&self, resource: &ResourceId) -> Option<Check> {
        self.checks.read().get(resource).cloned()
    }

    /// Return the user's check for `resource`, creating it if the backend has
    /// none.
    ///
    /// A failed creation is a soft failure: `Ok(None)`.
    pub async fn get_or_create_check(&self, resource: &ResourceId) -> Result<Option<Check>> {
        if let Some(check) = self.cached(resource) {
            return Ok(Some(check));
        }

        let user = self.session.require_user()?;

        let check = match self.backend.find_check(&user, resource).await? {
            Some(existing) => existing,
            None => match self.backend.create_check(&user, resource).await {
                Ok(id) => Check {
                    id,
                    user,
                    object: resource.clone(),
                    checked: false,
                },
                Err(e) => {
                    tracing::warn!(%resource, "could not create check: {}", e);
                    return Ok(None);
                }
            },
        };

        // A concurrent lookup may have cached one first; keep that one.
        let cached = self
            .checks
            .write()
            .entry(resource.clone())
            .or_insert(check)
            .clone();
        self.notifier.emit(StoreEvent::CheckChanged(resource.clone()));
        Ok(Some(cached))
    }

    /// Flip the completion state of `resource` and return the new state.
    ///
    /// The cache changes only after the backend confirms. Toggles run one at a
    /// time, each starting from the state the previous one confirmed.
    pub async fn toggle_completion(&self, resource: &ResourceId) -> Result<bool> {
        let _toggle = self.toggles.lock().await;
        let check = self
            .get_or_create_check(resource)
            .await?
            .ok_or_else(|| SyncError::not_found("Check"))?;

        let checked = !check.checked;
        if checked {
            self.backend.mark_checked(&check.id).await?;
        } else {
            self.backend.unmark_checked(&check.id).await?;
        }

        self.checks.write().insert(
            resource.clone(),
            Check {
                checked,
                ..check
            },
        );
        self.notifier.emit(StoreEvent::CheckChanged(resource.clone()));
        tracing::debug!(%resource, checked, "toggled completion");
        Ok(checked)
    }

    pub fn clear(&self) {
        self.checks.write().clear();
    }
}
