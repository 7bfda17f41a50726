//! Item encryption and decryption under the session's vault key.
//!
//! Every secret gets a fresh random nonce, carried inside the base64
//! envelope, so two encryptions of the same password never produce the same
//! ciphertext. Both operations require an unlocked session and fail with
//! `VaultLocked` otherwise.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use zeroize::Zeroize;

use crate::crypto::encryption::{decrypt, encrypt};
use crate::crypto::keys::VaultKey;
use crate::errors::{PassVaultError, Result};
use crate::session::Session;

/// Encrypt a plaintext secret under the session's vault key.
///
/// Returns the base64 envelope stored as `encrypted_password` server-side.
pub fn encrypt_secret(session: &Session, plaintext: &str) -> Result<String> {
    let vault_key = session.vault_key()?;
    encrypt_secret_with_key(&vault_key, plaintext)
}

/// Decrypt an `encrypted_password` envelope under the session's vault key.
pub fn decrypt_secret(session: &Session, encoded: &str) -> Result<String> {
    let vault_key = session.vault_key()?;
    decrypt_secret_with_key(&vault_key, encoded)
}

/// Encrypt under an explicit vault key.
///
/// Rotation uses this directly: during a password change the old and new
/// keys are both live, and neither is the session's resident key yet.
pub fn encrypt_secret_with_key(vault_key: &VaultKey, plaintext: &str) -> Result<String> {
    let envelope = encrypt(vault_key.as_bytes(), plaintext.as_bytes())?;
    Ok(BASE64.encode(envelope))
}

/// Decrypt under an explicit vault key.
///
/// A wrong key or tampered envelope fails the GCM tag check and surfaces as
/// `DecryptionFailed` — never decoded garbage.
pub fn decrypt_secret_with_key(vault_key: &VaultKey, encoded: &str) -> Result<String> {
    let envelope = BASE64
        .decode(encoded)
        .map_err(|_| PassVaultError::DecryptionFailed)?;

    let plaintext_bytes = decrypt(vault_key.as_bytes(), &envelope)?;

    // Convert to String via from_utf8 which takes ownership (no clone).
    // On error, zeroize the bytes inside the error before discarding.
    String::from_utf8(plaintext_bytes).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        PassVaultError::Serialization("decrypted secret is not valid UTF-8".to_string())
    })
}
