//! The stored-credential shape exchanged with the server.

use serde::{Deserialize, Serialize};

/// A single vault item as the server stores and returns it.
///
/// `encrypted_password` is the base64 envelope produced by the vault cipher;
/// the plaintext only ever exists in memory on the client. `site` and `owner`
/// are server-visible metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultItem {
    /// Server-assigned row id.
    pub id: i64,

    /// The site/service this credential belongs to.
    pub site: String,

    /// Vault-key ciphertext of the secret (base64, nonce-prefixed envelope).
    pub encrypted_password: String,

    /// Id of the owning user account.
    pub owner: i64,
}
