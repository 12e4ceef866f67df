use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use tracing::debug;

/// Key the bearer token is stored under
pub const TOKEN_KEY: &str = "portfolio_token";

/// Persistent home for the bearer token.
///
/// Implementations hold at most one token. `load` returns `None` when
/// nothing has been stored or the entry was removed.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn remove(&self) -> Result<()>;
}

/// Token kept in a small JSON key-value file.
///
/// The file may hold other keys; only `portfolio_token` is touched.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read token file {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse token file {}", self.path.display()))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write token file {}", self.path.display()))?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(TOKEN_KEY))
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write_entries(&entries)?;
        debug!(path = %self.path.display(), "Token saved");
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(TOKEN_KEY).is_some() {
            self.write_entries(&entries)?;
            debug!(path = %self.path.display(), "Token removed");
        }
        Ok(())
    }
}

/// Process-local store. Clones share the same slot, so a test can keep a
/// handle and observe what the session wrote.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token.to_string()))),
        }
    }

    /// Current stored value
    pub fn stored(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let slot = self.slot.lock().map_err(|_| anyhow!("Token store lock poisoned"))?;
        Ok(slot.clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut slot = self.slot.lock().map_err(|_| anyhow!("Token store lock poisoned"))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        let mut slot = self.slot.lock().map_err(|_| anyhow!("Token store lock poisoned"))?;
        *slot = None;
        Ok(())
    }
}
