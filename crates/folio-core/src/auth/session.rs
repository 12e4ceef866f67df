use std::sync::{Arc, RwLock};

use anyhow::Result;
use tracing::{debug, info};

use super::store::{MemoryTokenStore, TokenStore};

/// Session shared between the client and its callers.
/// Locks are only held for the duration of a read or write, never across an await.
pub type SharedSession = Arc<RwLock<Session>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Authenticated,
    Anonymous,
}

/// The bearer token for one admin client and the store it is persisted in.
pub struct Session {
    store: Box<dyn TokenStore>,
    token: Option<String>,
}

impl Session {
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            token: None,
        }
    }

    /// Session that is never written to disk
    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStore::new())
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }

    /// Load a previously stored token. Returns whether one was found.
    pub fn load(&mut self) -> Result<bool> {
        self.token = self.store.load()?.filter(|t| !t.is_empty());
        debug!(found = self.token.is_some(), "Session loaded");
        Ok(self.token.is_some())
    }

    /// Become authenticated with a freshly issued token.
    ///
    /// The in-memory token is set even when persisting it fails, so the
    /// current run stays logged in.
    pub fn start(&mut self, token: String) -> Result<()> {
        let saved = self.store.save(&token);
        self.token = Some(token);
        info!("Session started");
        saved
    }

    /// Drop the token from memory and from the store
    pub fn clear(&mut self) -> Result<()> {
        if self.token.take().is_some() {
            info!("Session cleared");
        }
        self.store.remove()
    }

    /// Clear the session only while it still holds `token`. A token started
    /// after `token` was sent is left alone. Returns whether it was cleared.
    pub fn clear_if_current(&mut self, token: &str) -> Result<bool> {
        if self.token.as_deref() != Some(token) {
            debug!("Rejected token is no longer current, session kept");
            return Ok(false);
        }
        self.clear()?;
        Ok(true)
    }

    /// Get the bearer token if the session is authenticated
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn state(&self) -> SessionState {
        if self.token.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_anonymous() {
        let session = Session::in_memory();
        assert_eq!(session.state(), SessionState::Anonymous);
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_start_and_clear() {
        let store = MemoryTokenStore::new();
        let mut session = Session::new(store.clone());

        session.start("tok-1".to_string()).unwrap();
        assert_eq!(session.state(), SessionState::Authenticated);
        assert_eq!(store.stored().as_deref(), Some("tok-1"));

        session.clear().unwrap();
        assert_eq!(session.state(), SessionState::Anonymous);
        assert_eq!(store.stored(), None);
    }

    #[test]
    fn test_start_replaces_previous_token() {
        let store = MemoryTokenStore::new();
        let mut session = Session::new(store.clone());
        session.start("first".to_string()).unwrap();
        session.start("second".to_string()).unwrap();
        assert_eq!(session.token(), Some("second"));
        assert_eq!(store.stored().as_deref(), Some("second"));
    }

    #[test]
    fn test_load_existing_token() {
        let mut session = Session::new(MemoryTokenStore::with_token("saved"));
        assert!(session.load().unwrap());
        assert_eq!(session.token(), Some("saved"));
    }

    #[test]
    fn test_load_ignores_empty_token() {
        let mut session = Session::new(MemoryTokenStore::with_token(""));
        assert!(!session.load().unwrap());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_clear_if_current_keeps_newer_token() {
        let store = MemoryTokenStore::new();
        let mut session = Session::new(store.clone());
        session.start("old".to_string()).unwrap();
        session.start("new".to_string()).unwrap();

        assert!(!session.clear_if_current("old").unwrap());
        assert_eq!(session.token(), Some("new"));
        assert_eq!(store.stored().as_deref(), Some("new"));

        assert!(session.clear_if_current("new").unwrap());
        assert!(!session.is_authenticated());
        assert_eq!(store.stored(), None);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut a = Session::in_memory();
        let b = Session::in_memory();
        a.start("only-a".to_string()).unwrap();
        assert!(a.is_authenticated());
        assert!(!b.is_authenticated());
    }
}
