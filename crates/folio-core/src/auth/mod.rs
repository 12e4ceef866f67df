//! Authentication module for managing the admin session.
//!
//! This module provides:
//! - `Session`: the bearer token held by one client, with its two states
//! - `TokenStore`: where the token is persisted between runs, with file,
//!   keychain and in-memory implementations
//!
//! The token is kept under a single key, `portfolio_token`. There is no
//! client-side expiry; a stale token is discovered when the service answers
//! 401, at which point the client clears the session.

pub mod credentials;
pub mod session;
pub mod store;

pub use credentials::KeyringTokenStore;
pub use session::{Session, SessionState, SharedSession};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};
