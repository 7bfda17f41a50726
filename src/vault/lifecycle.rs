//! Vault-key lifecycle: registration, unlock, and password rotation.
//!
//! The vault key is wrapped (encrypted under the stretched master key) for
//! everything that leaves the device, and only ever unwrapped into the
//! session's secret store. Password rotation replaces the vault key outright
//! and re-encrypts every stored item, so the server can apply the whole
//! change as one transaction.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zeroize::Zeroize;

use crate::api::{LoginRequest, PasswordChangeRequest, RegisterRequest};
use crate::crypto::encryption::{decrypt_with_iv, encrypt_with_iv, generate_iv, NONCE_LEN};
use crate::crypto::kdf::{derive_master_key_with_params, normalize_email, KdfParams};
use crate::crypto::keys::{StretchedMasterKey, VaultKey, KEY_LEN};
use crate::errors::{PassVaultError, Result};
use crate::session::Session;
use crate::vault::cipher::{decrypt_secret_with_key, encrypt_secret_with_key};
use crate::vault::item::VaultItem;

// ---------------------------------------------------------------------------
// WrappedVaultKey
// ---------------------------------------------------------------------------

/// The vault key encrypted under the stretched master key.
///
/// This pair is the only representation of the vault key the server ever
/// stores; field names match the server's columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedVaultKey {
    /// AES-256-GCM ciphertext of the raw vault key, base64.
    #[serde(rename = "protected_vault_key")]
    pub ciphertext: String,

    /// The 12-byte wrap IV, base64, stored alongside the ciphertext.
    #[serde(rename = "protected_vault_key_iv")]
    pub iv: String,
}

/// Wrap a vault key under the stretched master key with a fresh random IV.
pub fn wrap_vault_key(
    vault_key: &VaultKey,
    stretched: &StretchedMasterKey,
) -> Result<WrappedVaultKey> {
    let iv = generate_iv();
    let ciphertext = encrypt_with_iv(stretched.enc_key(), vault_key.as_bytes(), &iv)?;

    Ok(WrappedVaultKey {
        ciphertext: BASE64.encode(ciphertext),
        iv: BASE64.encode(iv),
    })
}

/// Unwrap a vault key with the stretched master key.
///
/// A stretched key derived from the wrong password fails the GCM tag check,
/// which surfaces as `WrongCredentials` — there is no "garbage plaintext"
/// outcome to guess about.
pub fn unwrap_vault_key(
    wrapped: &WrappedVaultKey,
    stretched: &StretchedMasterKey,
) -> Result<VaultKey> {
    let ciphertext = BASE64.decode(&wrapped.ciphertext).map_err(|e| {
        PassVaultError::Serialization(format!("wrapped vault key is not valid base64: {e}"))
    })?;
    let iv_bytes = BASE64.decode(&wrapped.iv).map_err(|e| {
        PassVaultError::Serialization(format!("wrap IV is not valid base64: {e}"))
    })?;
    let iv: [u8; NONCE_LEN] = iv_bytes.as_slice().try_into().map_err(|_| {
        PassVaultError::Serialization(format!(
            "wrap IV has wrong length {} (expected {NONCE_LEN})",
            iv_bytes.len()
        ))
    })?;

    let mut key_bytes = decrypt_with_iv(stretched.enc_key(), &ciphertext, &iv)
        .map_err(|_| PassVaultError::WrongCredentials)?;

    if key_bytes.len() != KEY_LEN {
        key_bytes.zeroize();
        return Err(PassVaultError::WrongCredentials);
    }

    let bytes: [u8; KEY_LEN] = key_bytes
        .as_slice()
        .try_into()
        .map_err(|_| PassVaultError::WrongCredentials)?;
    key_bytes.zeroize();

    Ok(VaultKey::new(bytes))
}

// ---------------------------------------------------------------------------
// LifecycleManager
// ---------------------------------------------------------------------------

/// Orchestrates vault-key possession across registration, login, password
/// change, and logout.
///
/// Holds only the KDF parameters; all key material is derived per call and
/// dropped when the call returns.
pub struct LifecycleManager {
    params: KdfParams,
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleManager {
    /// Manager with the default KDF parameters.
    pub fn new() -> Self {
        Self {
            params: KdfParams::default(),
        }
    }

    /// Manager with explicit KDF parameters (e.g. from `Settings`).
    pub fn with_params(params: KdfParams) -> Self {
        Self { params }
    }

    /// Register a new account.
    ///
    /// Generates a fresh random vault key, wraps it under the new stretched
    /// master key, commits the unwrapped key into the session (auto-unlock),
    /// and returns the payload the API layer submits to the server.
    pub fn register(
        &self,
        session: &mut Session,
        email: &str,
        password: &str,
    ) -> Result<RegisterRequest> {
        let email = normalize_email(email)?;
        let master = derive_master_key_with_params(&email, password, &self.params)?;
        let stretched = master.stretch()?;
        let auth_hash = master.auth_hash(password)?;

        let vault_key = VaultKey::generate();
        let wrapped = wrap_vault_key(&vault_key, &stretched)?;

        session.unlock_with(&vault_key)?;
        info!("account registered, vault auto-unlocked");

        Ok(RegisterRequest {
            email,
            auth_hash,
            wrapped_vault_key: wrapped,
        })
    }

    /// Build the login payload for the given credentials.
    ///
    /// Derivation only, nothing is committed. The caller submits this,
    /// stores the returned token pair, fetches the wrapped vault key, and
    /// then calls `unlock`.
    pub fn login_request(&self, email: &str, password: &str) -> Result<LoginRequest> {
        let email = normalize_email(email)?;
        let master = derive_master_key_with_params(&email, password, &self.params)?;
        let auth_hash = master.auth_hash(password)?;

        Ok(LoginRequest { email, auth_hash })
    }

    /// Unlock the vault with login credentials and the wrapped key fetched
    /// from the server.
    ///
    /// On a wrong password nothing is committed to the secret store and the
    /// session stays locked.
    pub fn unlock(
        &self,
        session: &mut Session,
        email: &str,
        password: &str,
        wrapped: &WrappedVaultKey,
    ) -> Result<VaultKey> {
        let master = derive_master_key_with_params(email, password, &self.params)?;
        let stretched = master.stretch()?;

        let vault_key = unwrap_vault_key(wrapped, &stretched).map_err(|e| {
            debug!("vault key unwrap failed, session stays locked");
            e
        })?;

        session.unlock_with(&vault_key)?;
        Ok(vault_key)
    }

    /// Build the password-change batch: a new wrapped vault key plus every
    /// item re-encrypted under it.
    ///
    /// The old credentials must actually unwrap the current vault key —
    /// that is the client-side wrong-password check. Any item that fails to
    /// decrypt or re-encrypt aborts the whole rotation; the session and the
    /// server state are untouched until `PendingRotation::commit`.
    pub fn rotate(
        &self,
        email: &str,
        old_password: &str,
        new_password: &str,
        wrapped: &WrappedVaultKey,
        items: &[VaultItem],
    ) -> Result<PendingRotation> {
        // Prove the old credentials by unwrapping the current vault key.
        let old_master = derive_master_key_with_params(email, old_password, &self.params)?;
        let old_stretched = old_master.stretch()?;
        let old_vault_key = unwrap_vault_key(wrapped, &old_stretched)?;
        let current_auth_hash = old_master.auth_hash(old_password)?;

        // Derive the replacement hierarchy from the new password.
        let new_master = derive_master_key_with_params(email, new_password, &self.params)?;
        let new_stretched = new_master.stretch()?;
        let new_auth_hash = new_master.auth_hash(new_password)?;

        let new_vault_key = VaultKey::generate();
        let new_wrapped = wrap_vault_key(&new_vault_key, &new_stretched)?;

        // Re-encrypt every item. One failure poisons the whole batch —
        // a partially rotated vault is undecryptable, not half-broken.
        let mut reencrypted = Vec::with_capacity(items.len());
        for item in items {
            let mut plaintext = decrypt_secret_with_key(&old_vault_key, &item.encrypted_password)
                .map_err(|e| PassVaultError::RotationFailed {
                    item_id: item.id,
                    reason: e.to_string(),
                })?;

            let result = encrypt_secret_with_key(&new_vault_key, &plaintext);
            plaintext.zeroize();

            let encrypted_password = result.map_err(|e| PassVaultError::RotationFailed {
                item_id: item.id,
                reason: e.to_string(),
            })?;

            reencrypted.push(VaultItem {
                id: item.id,
                site: item.site.clone(),
                encrypted_password,
                owner: item.owner,
            });
        }

        info!(item_count = reencrypted.len(), "password rotation batch prepared");

        Ok(PendingRotation {
            request: PasswordChangeRequest {
                current_auth_hash,
                new_auth_hash,
                new_protected_vault_key: new_wrapped.ciphertext,
                new_protected_vault_key_iv: new_wrapped.iv,
                items: reencrypted,
            },
            new_vault_key,
        })
    }

    /// Log out: drop the vault key and tokens from the session.
    pub fn logout(&self, session: &mut Session) -> Result<()> {
        session.clear()
    }
}

// ---------------------------------------------------------------------------
// PendingRotation
// ---------------------------------------------------------------------------

/// A fully prepared password rotation awaiting server acceptance.
///
/// The caller submits `request()` to the password-change endpoint and calls
/// `commit` only after the server accepted the batch. Dropping the value
/// without committing leaves the old vault key authoritative, so a rejected
/// submission can never strand the client on a key the server doesn't have.
pub struct PendingRotation {
    request: PasswordChangeRequest,
    new_vault_key: VaultKey,
}

impl PendingRotation {
    /// The batch to submit: new auth hash, new wrapped key, all items.
    pub fn request(&self) -> &PasswordChangeRequest {
        &self.request
    }

    /// Install the new vault key into the session.
    ///
    /// Call this only after the server accepted the rotation batch.
    pub fn commit(self, session: &mut Session) -> Result<()> {
        session.unlock_with(&self.new_vault_key)?;
        info!("password rotation committed, new vault key active");
        Ok(())
    }
}
