//! The two seams through which the state layer reaches the outside world.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// A normalized failure from the remote call gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The backend answered with an explicit `error` message.
    #[error("{0}")]
    Remote(String),

    /// Non-success HTTP status without an error message in the body.
    #[error("Server error: {status} {reason}")]
    Status { status: u16, reason: String },

    /// The request never produced a response.
    #[error("Network error: Unable to reach server")]
    Network,

    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Failure reported by the object storage transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("{status} {reason}")]
    Status { status: u16, reason: String },

    #[error("{0}")]
    Transport(String),
}

/// Remote call gateway: concept actions and concept queries.
///
/// Implementations never panic on backend failures; every failure comes back
/// as a [`GatewayError`] value.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Invoke a mutating action and return its payload.
    async fn invoke_action(
        &self,
        concept: &str,
        action: &str,
        body: Value,
    ) -> Result<Value, GatewayError>;

    /// Invoke a query. Queries always yield a list of rows.
    async fn invoke_query(
        &self,
        concept: &str,
        query: &str,
        body: Value,
    ) -> Result<Vec<Value>, GatewayError>;
}

/// Raw transfer against the time-limited URLs handed out by the backend.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(&self, url: &str, content: &str, content_type: &str)
        -> Result<(), StorageError>;

    async fn download(&self, url: &str) -> Result<String, StorageError>;
}
