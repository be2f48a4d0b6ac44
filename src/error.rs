//! Error types surfaced by the roadmap state layer.

use thiserror::Error;

use crate::backend::GatewayError;

/// Errors returned by every public store operation.
///
/// The `Display` output is the human-readable message shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("User not authenticated")]
    Unauthenticated,

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    RemoteFailure(String),

    #[error("Failed to upload content: {status} {reason}. Content-type mismatch. Expected: {expected}")]
    ContentTypeMismatch {
        status: u16,
        reason: String,
        expected: String,
    },
}

impl SyncError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn remote(msg: impl Into<String>) -> Self {
        Self::RemoteFailure(msg.into())
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<GatewayError> for SyncError {
    fn from(e: GatewayError) -> Self {
        Self::RemoteFailure(e.to_string())
    }
}

pub type Result<T, E = SyncError> = std::result::Result<T, E>;
