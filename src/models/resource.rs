use serde::{Deserialize, Serialize};

use super::ids::{IndexedResourceId, ResourceId, ResourceListId, UserId};

/// An ordered container of resources, owned by exactly one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceList {
    #[serde(rename = "_id")]
    pub id: ResourceListId,
    pub owner: UserId,
    pub title: String,
    pub length: usize,
}

/// One positioned entry of a [`ResourceList`].
///
/// Within a list the `index` fields always form a dense permutation of
/// `[0, length)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedResource {
    #[serde(rename = "_id")]
    pub id: IndexedResourceId,
    /// The underlying resource object; checks and content are keyed by it.
    pub resource: ResourceId,
    pub title: String,
    pub list: ResourceListId,
    pub index: usize,
}
