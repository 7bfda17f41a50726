//! Session context — explicit possession of the vault key.
//!
//! The session replaces ambient "is there a key somewhere?" lookups with an
//! owned context object: the lifecycle manager transitions it between
//! `Locked` and `Unlocked`, and the vault cipher reads the key through it.
//! Anything that swaps the key (`rotate`) takes the session by `&mut`, so
//! the borrow checker rules out an encryption racing a key swap.

pub mod store;

use tracing::{debug, info};

use crate::crypto::keys::VaultKey;
use crate::errors::{PassVaultError, Result};

pub use store::{MemorySecretStore, SecretStore};

#[cfg(feature = "keyring-store")]
pub use store::KeyringSecretStore;

use store::names;

/// Current state of the session's vault-key possession.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultStatus {
    /// No vault key in the session; encrypt/decrypt calls fail.
    Locked,
    /// The vault key is resident in the secret store.
    Unlocked,
}

impl std::fmt::Display for VaultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Locked => write!(f, "locked"),
            Self::Unlocked => write!(f, "unlocked"),
        }
    }
}

/// A user session: the secret store plus the vault-key state on top of it.
pub struct Session {
    store: Box<dyn SecretStore>,
}

impl Session {
    /// Build a session over the given secret store backend.
    pub fn new(store: Box<dyn SecretStore>) -> Self {
        Self { store }
    }

    /// Build an ephemeral session that keeps everything in process memory.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemorySecretStore::new()))
    }

    /// Whether a vault key is currently resident.
    pub fn status(&self) -> Result<VaultStatus> {
        match self.store.get(names::VAULT_KEY)? {
            Some(_) => Ok(VaultStatus::Unlocked),
            None => Ok(VaultStatus::Locked),
        }
    }

    /// Commit an unwrapped vault key into the session.
    pub fn unlock_with(&mut self, vault_key: &VaultKey) -> Result<()> {
        self.store.set(names::VAULT_KEY, &vault_key.to_base64())?;
        info!("session unlocked");
        Ok(())
    }

    /// Read the resident vault key.
    ///
    /// Fails with `VaultLocked` when no key has been committed — the
    /// pre-condition for every encrypt/decrypt call.
    pub fn vault_key(&self) -> Result<VaultKey> {
        match self.store.get(names::VAULT_KEY)? {
            Some(encoded) => VaultKey::from_base64(&encoded),
            None => Err(PassVaultError::VaultLocked),
        }
    }

    /// Drop the vault key from the session, keeping any tokens.
    pub fn lock(&mut self) -> Result<()> {
        self.store.remove(names::VAULT_KEY)?;
        debug!("session locked");
        Ok(())
    }

    /// Store the access/refresh token pair returned by the login endpoint.
    pub fn set_tokens(&mut self, access_token: &str, refresh_token: &str) -> Result<()> {
        self.store.set(names::TOKEN, access_token)?;
        self.store.set(names::REFRESH_TOKEN, refresh_token)?;
        Ok(())
    }

    /// The current API access token, if any.
    pub fn access_token(&self) -> Result<Option<String>> {
        self.store.get(names::TOKEN)
    }

    /// The current API refresh token, if any.
    pub fn refresh_token(&self) -> Result<Option<String>> {
        self.store.get(names::REFRESH_TOKEN)
    }

    /// Full logout: drop the vault key and both tokens.
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(names::VAULT_KEY)?;
        self.store.remove(names::TOKEN)?;
        self.store.remove(names::REFRESH_TOKEN)?;
        info!("session cleared");
        Ok(())
    }
}
