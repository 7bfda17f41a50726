//! Vault module — encrypted credential storage for a zero-knowledge account.
//!
//! This module provides:
//! - The server-side item shape (`item`)
//! - Session-bound secret encryption/decryption (`cipher`)
//! - Vault-key wrapping and the register/unlock/rotate lifecycle (`lifecycle`)

pub mod cipher;
pub mod item;
pub mod lifecycle;

// Re-export the most commonly used items.
pub use cipher::{decrypt_secret, encrypt_secret};
pub use item::VaultItem;
pub use lifecycle::{
    unwrap_vault_key, wrap_vault_key, LifecycleManager, PendingRotation, WrappedVaultKey,
};
