//! Cryptographic primitives for the vault core.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - PBKDF2 master-key derivation, HKDF stretching, auth hash (`kdf`)
//! - Zeroizing key newtypes (`keys`)

pub mod encryption;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_master_key, ...};
pub use encryption::{decrypt, decrypt_with_iv, encrypt, encrypt_with_iv, generate_iv};
pub use kdf::{
    compute_auth_hash, derive_master_key, derive_master_key_with_params, normalize_email,
    stretch_master_key, KdfParams,
};
pub use keys::{AuthHash, MasterKey, StretchedMasterKey, VaultKey};
