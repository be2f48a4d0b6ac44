use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! backend_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

backend_id!(
    /// Identifier of a backend user.
    UserId
);
backend_id!(
    /// Identifier of a login session token.
    SessionToken
);
backend_id!(
    /// Identifier of an [`AssignedObject`](super::AssignedObject), i.e. a roadmap.
    RoadmapId
);
backend_id!(GraphId);
backend_id!(NodeId);
backend_id!(EdgeId);
backend_id!(ResourceListId);
backend_id!(
    /// Identifier of the resource object an [`IndexedResource`](super::IndexedResource)
    /// points at. Checks and content files are keyed by this, not by the
    /// indexed entry.
    ResourceId
);
backend_id!(IndexedResourceId);
backend_id!(CheckId);
backend_id!(FileId);

impl ResourceId {
    /// Allocate a fresh resource identifier on the client.
    ///
    /// The backend does not hand out resource ids before a resource is
    /// attached to a list, so the client picks one. A random v4 UUID keeps
    /// two clients appending at the same instant from colliding.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}
