//! The client-side state layer.
//!
//! Each store owns one slice of the mirrored backend state and is the only
//! writer of it:
//!
//! - [`RoadmapManager`]: roadmaps, and the nodes/edges/selection of the one
//!   roadmap currently loaded.
//! - [`ResourceListEngine`]: ordered resources per resource list.
//! - [`CompletionCache`]: per-resource checks.
//! - [`ContentCache`]: per-resource free-text content.
//! - [`SharingView`]: roadmaps shared with the user.
//!
//! Stores are shared through `Arc`. Their collections sit behind
//! `parking_lot` locks that are never held across an `.await`, so a mutation
//! is never interleaved with another writer. Consumers observe changes by
//! subscribing to [`StoreEvent`]s.

mod completion;
mod content;
mod dag;
mod resources;
mod sharing;

use std::future::Future;

use futures::future::join_all;
use tokio::sync::broadcast;

pub use completion::CompletionCache;
pub use content::{ContentCache, CONTENT_TYPE};
pub use dag::{LoadStatus, RoadmapManager};
pub use resources::{reorder_in_place, ResourceListEngine};
pub use sharing::SharingView;

use crate::error::Result;
use crate::models::{ResourceId, ResourceListId};

const EVENT_CAPACITY: usize = 256;

/// Something in the mirrored state changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    RoadmapsChanged,
    SharedRoadmapsChanged,
    /// Nodes, edges, load status or selection of the loaded roadmap.
    GraphChanged,
    ResourcesChanged(ResourceListId),
    CheckChanged(ResourceId),
    ContentChanged(ResourceId),
}

/// Fan-out of [`StoreEvent`]s to any number of subscribers.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<StoreEvent>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    pub(crate) fn emit(&self, event: StoreEvent) {
        // No subscribers is fine.
        let _ = self.tx.send(event);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Run independent remote lookups concurrently. The join always resolves;
/// each failed item becomes `None` instead of failing the batch.
pub(crate) async fn join_tolerant<I, F, T>(label: &str, tasks: I) -> Vec<Option<T>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T>>,
{
    join_all(tasks)
        .await
        .into_iter()
        .map(|outcome| match outcome {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(batch = label, "skipping failed item: {}", e);
                None
            }
        })
        .collect()
}
