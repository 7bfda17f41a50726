//! Password-based key derivation using PBKDF2-HMAC-SHA256 and HKDF-SHA256.
//!
//! Three derivations, all pure functions over the provided bytes:
//!
//! 1. `derive_master_key` — (email, password) → 256-bit master key. The salt
//!    is the case-folded email so every client derives the same key without
//!    any server-side secret storage.
//! 2. `stretch_master_key` — master key → 512-bit key-wrapping key via HKDF
//!    expansion with fixed domain-separation labels.
//! 3. `compute_auth_hash` — (master key, password) → the value sent to the
//!    server for authentication. A distinct derivation path from both keys
//!    above, so a server-side compromise of the auth hash cannot be turned
//!    into the key-wrapping key.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hkdf::Hkdf;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::errors::{PassVaultError, Result};

use super::keys::{AuthHash, MasterKey, StretchedMasterKey, KEY_LEN, STRETCHED_HALF_LEN};

/// Minimum PBKDF2 iteration count accepted for master-key derivation.
const MIN_ITERATIONS: u32 = 10_000;

/// Default PBKDF2 iteration count (matches the server's own re-hash cost).
const DEFAULT_ITERATIONS: u32 = 600_000;

/// Iterations for the auth-hash pass. A single round is enough: the input
/// master key already paid the full derivation cost, and the server re-hashes
/// the auth hash with its own salted PBKDF2 before storing it.
const AUTH_HASH_ITERATIONS: u32 = 1;

/// HKDF info label for the encryption half of the stretched key.
const INFO_WRAP_ENC: &[u8] = b"passvault:wrap-enc";

/// HKDF info label for the MAC half of the stretched key.
const INFO_WRAP_MAC: &[u8] = b"passvault:wrap-mac";

/// Configurable KDF parameters.
///
/// Maps 1:1 to the `kdf_iterations` field in `Settings` so the application
/// can pass whatever was configured, subject to the `MIN_ITERATIONS` floor.
#[derive(Debug, Clone, Copy)]
pub struct KdfParams {
    /// PBKDF2 iteration count (default: 600 000).
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

/// Case-fold and validate an email address for use as KDF salt.
///
/// Normalization must happen before derivation, else the same account
/// silently derives different keys on clients that disagree about casing.
pub fn normalize_email(email: &str) -> Result<String> {
    let normalized = email.trim().to_lowercase();

    if normalized.is_empty() {
        return Err(PassVaultError::InvalidInput("email must not be empty".into()));
    }
    if !normalized.contains('@') {
        return Err(PassVaultError::InvalidInput(format!(
            "'{normalized}' is not a valid email address"
        )));
    }

    Ok(normalized)
}

/// Reject empty or whitespace-only passwords before any cryptography runs.
fn validate_password(password: &str) -> Result<()> {
    if password.trim().is_empty() {
        return Err(PassVaultError::InvalidInput(
            "password must not be empty".into(),
        ));
    }
    Ok(())
}

/// Derive the master key with the default iteration count.
pub fn derive_master_key(email: &str, password: &str) -> Result<MasterKey> {
    derive_master_key_with_params(email, password, &KdfParams::default())
}

/// Derive the 32-byte master key from (email, password).
///
/// PBKDF2-HMAC-SHA256 with salt = case-folded email. Deterministic: the same
/// credentials always yield the same key, which is what lets login rebuild
/// the unwrapping key from scratch. Enforces the iteration floor so a
/// misconfigured client cannot silently weaken the derivation.
pub fn derive_master_key_with_params(
    email: &str,
    password: &str,
    params: &KdfParams,
) -> Result<MasterKey> {
    let salt = normalize_email(email)?;
    validate_password(password)?;

    if params.iterations < MIN_ITERATIONS {
        return Err(PassVaultError::KeyDerivationFailed(format!(
            "PBKDF2 iterations must be at least {MIN_ITERATIONS} (got {})",
            params.iterations
        )));
    }

    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        salt.as_bytes(),
        params.iterations,
        &mut key,
    );

    let master = MasterKey::new(key);
    key.zeroize();
    Ok(master)
}

/// Expand the master key into the 512-bit stretched key-wrapping key.
///
/// HKDF-SHA256 with a zero extract salt (the master key is already uniform,
/// it came out of PBKDF2) and two fixed info labels, one per half. One-way
/// and deterministic; the output is used solely to wrap/unwrap the vault key.
pub fn stretch_master_key(master_key: &MasterKey) -> Result<StretchedMasterKey> {
    let hk = Hkdf::<Sha256>::new(None, master_key.as_bytes());

    let mut enc = [0u8; STRETCHED_HALF_LEN];
    hk.expand(INFO_WRAP_ENC, &mut enc)
        .map_err(|e| PassVaultError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    let mut mac = [0u8; STRETCHED_HALF_LEN];
    hk.expand(INFO_WRAP_MAC, &mut mac)
        .map_err(|e| PassVaultError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    let stretched = StretchedMasterKey::new(enc, mac);
    enc.zeroize();
    mac.zeroize();
    Ok(stretched)
}

/// Compute the server authentication hash.
///
/// A second PBKDF2 pass with the master key as input keying material and the
/// plaintext password as salt. The reversed roles give it a derivation path
/// disjoint from the master key itself, and HKDF's domain labels keep it
/// disjoint from the stretched key.
pub fn compute_auth_hash(master_key: &MasterKey, password: &str) -> Result<AuthHash> {
    validate_password(password)?;

    let mut hash = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(
        master_key.as_bytes(),
        password.as_bytes(),
        AUTH_HASH_ITERATIONS,
        &mut hash,
    );

    let encoded = BASE64.encode(hash);
    hash.zeroize();
    Ok(AuthHash::new(encoded))
}
