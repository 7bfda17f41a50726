//! Secret store backends.
//!
//! The session keeps its small opaque strings (tokens, the unwrapped vault
//! key) behind the `SecretStore` capability so the storage backend is chosen
//! once at composition time:
//! - `MemorySecretStore` — process-lifetime storage, default for tests and
//!   ephemeral sessions.
//! - `KeyringSecretStore` — OS credential store (macOS Keychain, Windows
//!   Credential Manager, Linux Secret Service), behind the `keyring-store`
//!   feature.

use std::collections::HashMap;

use zeroize::Zeroize;

use crate::errors::Result;

/// Well-known secret names used by the session.
pub mod names {
    /// The API access token.
    pub const TOKEN: &str = "token";

    /// The API refresh token.
    pub const REFRESH_TOKEN: &str = "refresh_token";

    /// The unwrapped vault key, base64-encoded.
    pub const VAULT_KEY: &str = "vault_key";
}

/// Platform-appropriate persistent store for small opaque strings.
///
/// Semantics are last-writer-wins by name; there is no transactional
/// guarantee beyond "a completed `set` is visible to subsequent `get`s".
pub trait SecretStore {
    /// Store `value` under `name`, replacing any previous value.
    fn set(&mut self, name: &str, value: &str) -> Result<()>;

    /// Retrieve the value stored under `name`, or `None` if absent.
    fn get(&self, name: &str) -> Result<Option<String>>;

    /// Delete the value stored under `name`. Deleting an absent name is not
    /// an error.
    fn remove(&mut self, name: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// MemorySecretStore
// ---------------------------------------------------------------------------

/// In-memory secret store. Contents are zeroed when the store is dropped.
#[derive(Default)]
pub struct MemorySecretStore {
    values: HashMap<String, String>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for MemorySecretStore {
    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        if let Some(mut old) = self.values.insert(name.to_string(), value.to_string()) {
            old.zeroize();
        }
        Ok(())
    }

    fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.values.get(name).cloned())
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        if let Some(mut old) = self.values.remove(name) {
            old.zeroize();
        }
        Ok(())
    }
}

impl Drop for MemorySecretStore {
    fn drop(&mut self) {
        for (_, value) in self.values.iter_mut() {
            value.zeroize();
        }
    }
}

// ---------------------------------------------------------------------------
// KeyringSecretStore
// ---------------------------------------------------------------------------

/// OS keyring-backed secret store.
///
/// All operations fail gracefully — if the keyring is unavailable, the error
/// is surfaced and the caller can fall back to an in-memory session.
#[cfg(feature = "keyring-store")]
pub use os_keyring::KeyringSecretStore;

#[cfg(feature = "keyring-store")]
mod os_keyring {
    use super::SecretStore;
    use crate::errors::{PassVaultError, Result};

    /// Service name used in the OS keyring.
    const SERVICE_NAME: &str = "passvault";

    /// Secret store backed by the operating system's credential store.
    pub struct KeyringSecretStore {
        /// Account identifier (normalized email) scoping the entries, so two
        /// accounts on the same device never collide.
        account: String,
    }

    impl KeyringSecretStore {
        pub fn new(account: &str) -> Self {
            Self {
                account: account.to_string(),
            }
        }

        /// Build a keyring entry for a secret name scoped to this account.
        fn entry(&self, name: &str) -> Result<keyring::Entry> {
            let user = format!("{}/{name}", self.account);
            keyring::Entry::new(SERVICE_NAME, &user).map_err(|e| {
                PassVaultError::SecretStore(format!("failed to create keyring entry: {e}"))
            })
        }
    }

    impl SecretStore for KeyringSecretStore {
        fn set(&mut self, name: &str, value: &str) -> Result<()> {
            self.entry(name)?.set_password(value).map_err(|e| {
                PassVaultError::SecretStore(format!("failed to store secret in keyring: {e}"))
            })
        }

        fn get(&self, name: &str) -> Result<Option<String>> {
            match self.entry(name)?.get_password() {
                Ok(value) => Ok(Some(value)),
                Err(keyring::Error::NoEntry) => Ok(None),
                Err(e) => Err(PassVaultError::SecretStore(format!(
                    "failed to read from keyring: {e}"
                ))),
            }
        }

        fn remove(&mut self, name: &str) -> Result<()> {
            match self.entry(name)?.delete_credential() {
                Ok(()) => Ok(()),
                Err(keyring::Error::NoEntry) => Ok(()), // Already gone, that's fine.
                Err(e) => Err(PassVaultError::SecretStore(format!(
                    "failed to delete from keyring: {e}"
                ))),
            }
        }
    }
}
