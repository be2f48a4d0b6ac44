//! Client configuration.
//!
//! Values come from `<config dir>/roadmap-sync/config.json` when present,
//! then environment variables override them:
//! - `ROADMAP_API_URL` - Backend root URL (default: `http://localhost:8000`)
//! - `ROADMAP_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `ROADMAP_SESSION_FILE` - Where the login session is persisted

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "roadmap-sync";
const CONFIG_FILE: &str = "config.json";
const SESSION_FILE: &str = "session.json";

const DEFAULT_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// On-disk shape of the config file. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct FileConfig {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    session_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend root; concept calls go to `{base_url}/api/...`.
    pub base_url: String,
    pub request_timeout: Duration,
    /// Persisted session location. `None` keeps the session in memory only.
    pub session_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_path: app_dir().ok().map(|dir| dir.join(SESSION_FILE)),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the user's config directory and environment.
    /// Falls back to defaults (still honoring the environment) if the file
    /// is unreadable.
    pub fn load() -> Self {
        let base = match app_dir() {
            Ok(dir) => match Self::from_path(&dir.join(CONFIG_FILE)) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to load config, using defaults: {:#}", e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let file: FileConfig =
            serde_json::from_str(&content).context("Failed to parse config file")?;

        let mut config = Self::default();
        if let Some(url) = file.base_url {
            config.base_url = url;
        }
        if let Some(secs) = file.timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(path) = file.session_file {
            config.session_path = Some(path);
        }
        Ok(config)
    }

    /// Apply `ROADMAP_*` overrides looked up through `var`.
    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = var("ROADMAP_API_URL") {
            self.base_url = url;
        }
        if let Some(secs) = var("ROADMAP_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(path) = var("ROADMAP_SESSION_FILE") {
            self.session_path = Some(PathBuf::from(path));
        }
        self
    }
}

fn app_dir() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    Ok(path)
}
