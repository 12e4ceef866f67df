//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the API base URL, the last used username, where the session token is
//! kept, the request timeout, and the profile shown on the showcase page.
//!
//! Configuration is stored at `~/.config/folio-admin/config.json`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::client::REQUEST_TIMEOUT_SECS;
use crate::api::AdminClient;
use crate::auth::{FileTokenStore, KeyringTokenStore, Session};

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "folio-admin";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Key-value file holding the session token
const STORAGE_FILE: &str = "storage.json";

/// Environment variable overriding the API base URL
pub const API_BASE_ENV: &str = "FOLIO_API_BASE";

/// Local development backend, also used when nothing else is configured
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorage {
    #[default]
    File,
    Keyring,
}

/// Owner details rendered on the showcase page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub roles: Vec<String>,
    pub about: String,
    pub contact: Vec<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Portfolio".to_string(),
            roles: [
                "DevOps Engineer",
                "Software Developer",
                "Cloud Enthusiast",
                "ICT Student",
                "Problem Solver",
            ]
            .iter()
            .map(|r| r.to_string())
            .collect(),
            about: "Certificates, projects and the occasional side quest.".to_string(),
            contact: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base: Option<String>,
    pub last_username: Option<String>,
    pub token_storage: TokenStorage,
    pub request_timeout_secs: u64,
    pub profile: Profile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: None,
            last_username: None,
            token_storage: TokenStorage::default(),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            profile: Profile::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME))
    }

    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// API base URL: environment first, then the config file, then the
    /// local development backend.
    pub fn api_base(&self) -> String {
        resolve_api_base(std::env::var(API_BASE_ENV).ok().as_deref(), self.api_base.as_deref())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(if self.request_timeout_secs == 0 {
            REQUEST_TIMEOUT_SECS
        } else {
            self.request_timeout_secs
        })
    }

    /// Build an unloaded session over the configured token store
    pub fn session(&self) -> Result<Session> {
        Ok(match self.token_storage {
            TokenStorage::File => Session::new(FileTokenStore::new(Self::config_dir()?.join(STORAGE_FILE))),
            TokenStorage::Keyring => Session::new(KeyringTokenStore),
        })
    }

    /// Client for the configured service, resuming any stored session.
    /// An unreadable token store starts the session anonymous.
    pub fn connect(&self) -> Result<AdminClient> {
        let mut session = self.session()?;
        if let Err(e) = session.load() {
            warn!(error = %e, "Failed to load stored session");
        }
        let client = AdminClient::with_timeout(&self.api_base(), session.into_shared(), self.request_timeout())?;
        Ok(client)
    }
}

/// Pick the first non-blank candidate and strip trailing slashes
pub fn resolve_api_base(env_value: Option<&str>, configured: Option<&str>) -> String {
    [env_value, configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or(DEFAULT_API_BASE)
        .trim_end_matches('/')
        .to_string()
}
