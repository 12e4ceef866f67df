use anyhow::{Context, Result};
use keyring::Entry;

use super::store::{TokenStore, TOKEN_KEY};

const SERVICE_NAME: &str = "folio-admin";

/// Token kept in the OS keychain under `folio-admin` / `portfolio_token`
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    fn entry() -> Result<Entry> {
        Entry::new(SERVICE_NAME, TOKEN_KEY).context("Failed to create keyring entry")
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match Self::entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve token from keychain"),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        Self::entry()?
            .set_password(token)
            .context("Failed to store token in keychain")
    }

    fn remove(&self) -> Result<()> {
        match Self::entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }
}
