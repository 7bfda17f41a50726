//! Zeroizing key material types.
//!
//! Every key in the hierarchy gets its own newtype so the compiler keeps
//! them apart:
//! - `MasterKey` — derived from (email, password), never leaves the client.
//! - `StretchedMasterKey` — HKDF expansion of the master key, used only to
//!   wrap/unwrap the vault key.
//! - `VaultKey` — random per-account key that encrypts the actual secrets.
//! - `AuthHash` — the only credential-derived value the server ever sees.
//!
//! All raw key bytes are zeroed when the value is dropped.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::errors::{PassVaultError, Result};

/// Length of the master key and vault key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Length of one half of the stretched master key (256 bits).
pub const STRETCHED_HALF_LEN: usize = 32;

// ---------------------------------------------------------------------------
// MasterKey
// ---------------------------------------------------------------------------

/// The password-derived master key.
///
/// Recomputed from credentials on every login/register/password-change and
/// discarded immediately after use. Never transmitted, never persisted.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Create a new `MasterKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to pass to HKDF or the auth hash).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Expand this master key into a `StretchedMasterKey`.
    pub fn stretch(&self) -> Result<StretchedMasterKey> {
        super::kdf::stretch_master_key(self)
    }

    /// Compute the server authentication hash for this master key.
    pub fn auth_hash(&self, password: &str) -> Result<AuthHash> {
        super::kdf::compute_auth_hash(self, password)
    }
}

// ---------------------------------------------------------------------------
// StretchedMasterKey
// ---------------------------------------------------------------------------

/// The 512-bit key-wrapping key, split into purpose-bound halves.
///
/// Only the encryption half is consumed by AES-256-GCM when wrapping the
/// vault key; the MAC half is derived alongside it so a future
/// encrypt-then-MAC mode can use it without changing the derivation path.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct StretchedMasterKey {
    enc: [u8; STRETCHED_HALF_LEN],
    mac: [u8; STRETCHED_HALF_LEN],
}

impl StretchedMasterKey {
    /// Assemble a stretched key from its two derived halves.
    pub fn new(enc: [u8; STRETCHED_HALF_LEN], mac: [u8; STRETCHED_HALF_LEN]) -> Self {
        Self { enc, mac }
    }

    /// The half used as the AES-256-GCM key-wrapping key.
    pub fn enc_key(&self) -> &[u8; STRETCHED_HALF_LEN] {
        &self.enc
    }

    /// The reserved MAC half.
    pub fn mac_key(&self) -> &[u8; STRETCHED_HALF_LEN] {
        &self.mac
    }
}

// ---------------------------------------------------------------------------
// VaultKey
// ---------------------------------------------------------------------------

/// The random per-account content-encryption key.
///
/// Generated once at registration, replaced on password rotation. This is
/// the only key that ever encrypts or decrypts stored credential secrets.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct VaultKey {
    bytes: [u8; KEY_LEN],
}

impl VaultKey {
    /// Create a `VaultKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Generate a fresh random vault key from the OS RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Encode the key as base64 for the session secret store.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.bytes)
    }

    /// Decode a key previously stored with `to_base64`.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let decoded = BASE64
            .decode(encoded)
            .map_err(|e| PassVaultError::SecretStore(format!("stored vault key is not valid base64: {e}")))?;

        let bytes: [u8; KEY_LEN] = decoded.as_slice().try_into().map_err(|_| {
            PassVaultError::SecretStore(format!(
                "stored vault key has wrong length {} (expected {KEY_LEN})",
                decoded.len()
            ))
        })?;

        Ok(Self { bytes })
    }
}

impl PartialEq for VaultKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl Eq for VaultKey {}

// ---------------------------------------------------------------------------
// AuthHash
// ---------------------------------------------------------------------------

/// The credential-derived value sent to the server in place of the password.
///
/// Base64-encoded; the server re-hashes it before storage, so possession of
/// the stored value does not allow unwrapping any vault key.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct AuthHash(String);

impl AuthHash {
    /// Wrap an already-encoded auth hash.
    pub fn new(encoded: String) -> Self {
        Self(encoded)
    }

    /// The base64 string form submitted to the server.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for AuthHash {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl Eq for AuthHash {}

impl std::fmt::Display for AuthHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
