use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{join_tolerant, CompletionCache, Notifier, StoreEvent};
use crate::backend::Backend;
use crate::error::{Result, SyncError};
use crate::models::{IndexedResource, ResourceId, ResourceListId};

/// Move the entry at `from` to `to` and renumber every entry so the `index`
/// fields match positions again.
///
/// `to` past the end is clamped to the last position. Returns the position the
/// entry landed on.
pub fn reorder_in_place(
    resources: &mut Vec<IndexedResource>,
    from: usize,
    to: usize,
) -> Result<usize> {
    if from >= resources.len() {
        return Err(SyncError::not_found("Resource"));
    }
    let moved = resources.remove(from);
    let to = to.min(resources.len());
    resources.insert(to, moved);
    for (position, resource) in resources.iter_mut().enumerate() {
        resource.index = position;
    }
    Ok(to)
}

/// Ordered resources of each resource list, keyed by list id.
pub struct ResourceListEngine {
    backend: Backend,
    completions: Arc<CompletionCache>,
    notifier: Notifier,
    lists: RwLock<HashMap<ResourceListId, Vec<IndexedResource>>>,
}

impl ResourceListEngine {
    pub fn new(backend: Backend, completions: Arc<CompletionCache>, notifier: Notifier) -> Self {
        Self {
            backend,
            completions,
            notifier,
            lists: RwLock::new(HashMap::new()),
        }
    }

    pub fn resources(&self, list: &ResourceListId) -> Option<Vec<IndexedResource>> {
        self.lists.read().get(list).cloned()
    }

    /// Fetch the authoritative sequence for `list`, replace the cached one,
    /// then make sure every resource has a cached check.
    pub async fn load_resources(&self, list: &ResourceListId) -> Result<Vec<IndexedResource>> {
        let mut resources = match self.backend.list_resources(list).await {
            Ok(resources) => resources,
            Err(e) => {
                self.forget(list);
                return Err(e);
            }
        };
        resources.sort_by_key(|r| r.index);

        self.lists.write().insert(list.clone(), resources.clone());
        self.notifier
            .emit(StoreEvent::ResourcesChanged(list.clone()));

        join_tolerant(
            "checks",
            resources
                .iter()
                .map(|r| self.completions.get_or_create_check(&r.resource)),
        )
        .await;

        Ok(resources)
    }

    /// Append a new resource titled `title` and return its generated id.
    ///
    /// Positions are assigned by the backend, so the list is reloaded rather
    /// than patched.
    pub async fn append_resource(&self, list: &ResourceListId, title: &str) -> Result<ResourceId> {
        let title = title.trim();
        if title.is_empty() {
            return Err(SyncError::InvalidInput(
                "Resource title cannot be empty".to_string(),
            ));
        }

        let resource = ResourceId::generate();
        self.backend.append_resource(list, &resource, title).await?;
        tracing::info!(%list, %resource, "appended resource");

        self.reload_after_write(list).await;
        Ok(resource)
    }

    pub async fn remove_resource(&self, list: &ResourceListId, index: usize) -> Result<()> {
        let out_of_range = self
            .lists
            .read()
            .get(list)
            .is_some_and(|resources| index >= resources.len());
        if out_of_range {
            return Err(SyncError::not_found("Resource"));
        }

        self.backend.delete_resource(list, index).await?;
        tracing::info!(%list, index, "removed resource");

        self.reload_after_write(list).await;
        Ok(())
    }

    /// Move a resource, updating the cached order before the backend answers.
    ///
    /// If the backend rejects the move, the optimistic order is thrown away and
    /// the list is reloaded from the backend.
    pub async fn reorder_resource(
        &self,
        list: &ResourceListId,
        from: usize,
        to: usize,
    ) -> Result<()> {
        if from == to {
            return Ok(());
        }

        let to = {
            let mut lists = self.lists.write();
            let resources = lists
                .get_mut(list)
                .ok_or_else(|| SyncError::not_found("Resource"))?;
            if from >= resources.len() {
                return Err(SyncError::not_found("Resource"));
            }
            if to.min(resources.len() - 1) == from {
                return Ok(());
            }
            reorder_in_place(resources, from, to)?
        };
        self.notifier
            .emit(StoreEvent::ResourcesChanged(list.clone()));

        if let Err(e) = self.backend.move_resource(list, from, to).await {
            tracing::warn!(%list, from, to, "move rejected, reloading: {}", e);
            if let Err(reload) = self.load_resources(list).await {
                tracing::warn!(%list, "reload after failed move also failed: {}", reload);
            }
            return Err(e);
        }

        Ok(())
    }

    /// Drop the cached sequence for `list`.
    pub fn forget(&self, list: &ResourceListId) {
        if self.lists.write().remove(list).is_some() {
            self.notifier
                .emit(StoreEvent::ResourcesChanged(list.clone()));
        }
    }

    pub fn clear(&self) {
        self.lists.write().clear();
    }

    async fn reload_after_write(&self, list: &ResourceListId) {
        if let Err(e) = self.load_resources(list).await {
            tracing::warn!(%list, "reload after write failed: {}", e);
        }
    }
}
