//! AES-256-GCM authenticated encryption.
//!
//! Two flavors, one envelope rule:
//!
//! - `encrypt`/`decrypt` generate a fresh random 12-byte nonce per call and
//!   prepend it to the ciphertext. This is the item-encryption path; reusing
//!   a single stored IV across ciphertexts would void GCM's guarantees, so
//!   the nonce always travels inside the envelope.
//! - `encrypt_with_iv`/`decrypt_with_iv` take the nonce separately. This is
//!   the vault-key wrapping path, where the server stores the IV in its own
//!   column next to the wrapped key.
//!
//! Layout of the `encrypt` output buffer:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use rand::RngCore;

use crate::errors::{PassVaultError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Encrypt `plaintext` with a 32-byte `key`.
///
/// Returns the nonce prepended to the ciphertext (nonce || ciphertext).
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| PassVaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    // Fresh random 12-byte nonce for every call.
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| PassVaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    // Prepend the nonce so the caller only needs to store one blob.
    let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt data that was produced by `encrypt`.
///
/// Expects the first 12 bytes to be the nonce, followed by the ciphertext.
/// A wrong key or a flipped bit fails the tag check and returns
/// `DecryptionFailed` — never silent garbage.
pub fn decrypt(key: &[u8], ciphertext_with_nonce: &[u8]) -> Result<Vec<u8>> {
    // Make sure we have at least a nonce worth of bytes.
    if ciphertext_with_nonce.len() < NONCE_LEN {
        return Err(PassVaultError::DecryptionFailed);
    }

    let (nonce_bytes, ciphertext) = ciphertext_with_nonce.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| PassVaultError::DecryptionFailed)?;

    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| PassVaultError::DecryptionFailed)?;

    Ok(plaintext)
}

/// Encrypt with an explicit nonce, returning the bare ciphertext.
///
/// The caller owns the nonce and must carry it to `decrypt_with_iv`. Used
/// for key wrapping, where nonce and ciphertext live in separate fields of
/// the server record.
pub fn encrypt_with_iv(key: &[u8], plaintext: &[u8], iv: &[u8; NONCE_LEN]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| PassVaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    cipher
        .encrypt(Nonce::from_slice(iv), plaintext)
        .map_err(|e| PassVaultError::EncryptionFailed(format!("encryption error: {e}")))
}

/// Inverse of `encrypt_with_iv`.
pub fn decrypt_with_iv(key: &[u8], ciphertext: &[u8], iv: &[u8; NONCE_LEN]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| PassVaultError::DecryptionFailed)?;

    cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| PassVaultError::DecryptionFailed)
}

/// Generate a cryptographically random 12-byte IV for key wrapping.
pub fn generate_iv() -> [u8; NONCE_LEN] {
    let mut iv = [0u8; NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut iv);
    iv
}
