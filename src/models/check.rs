use serde::{Deserialize, Serialize};

use super::ids::{CheckId, ResourceId, UserId};

/// Completion state of one resource for one user.
///
/// There is at most one check per `(user, object)`. Checks are created lazily
/// the first time a resource's state is needed and start unchecked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    #[serde(rename = "_id")]
    pub id: CheckId,
    pub user: UserId,
    pub object: ResourceId,
    #[serde(default)]
    pub checked: bool,
}
