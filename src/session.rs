//! Session context: who is acting.
//!
//! Every store reads the current user through a shared [`Session`] handle
//! instead of an ambient global. [`SessionFile`] persists the identity between
//! CLI invocations.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::models::{SessionToken, UserId};

/// The signed-in user and their session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user: UserId,
    pub session: SessionToken,
}

/// Cloneable handle to the current identity. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    identity: Arc<RwLock<Option<Identity>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.identity.read().clone()
    }

    pub fn current_user(&self) -> Option<UserId> {
        self.identity.read().as_ref().map(|i| i.user.clone())
    }

    /// The current user, or [`SyncError::Unauthenticated`].
    pub fn require_user(&self) -> Result<UserId, SyncError> {
        self.current_user().ok_or(SyncError::Unauthenticated)
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.read().is_some()
    }

    pub fn set(&self, identity: Identity) {
        *self.identity.write() = Some(identity);
    }

    pub fn clear(&self) {
        *self.identity.write() = None;
    }
}

/// JSON file holding the last signed-in identity.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the stored identity. A missing file means nobody is signed in.
    pub fn load(&self) -> Result<Option<Identity>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).context("Failed to read session file")?;
        let identity = serde_json::from_str(&content).context("Failed to parse session file")?;
        Ok(Some(identity))
    }

    pub fn save(&self, identity: &Identity) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create session directory")?;
        }
        let content =
            serde_json::to_string_pretty(identity).context("Failed to serialize session")?;
        fs::write(&self.path, content).context("Failed to write session file")?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).context("Failed to remove session file")?;
        }
        Ok(())
    }
}
