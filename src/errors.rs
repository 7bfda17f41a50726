use thiserror::Error;

/// All errors that can occur in the vault core.
#[derive(Debug, Error)]
pub enum PassVaultError {
    // --- Input validation ---
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // --- Crypto errors ---
    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong key or corrupted data")]
    DecryptionFailed,

    // --- Credential / session errors ---
    #[error("Wrong credentials — vault key could not be unwrapped")]
    WrongCredentials,

    #[error("Vault is locked — no vault key in the current session")]
    VaultLocked,

    // --- Rotation errors ---
    #[error("Password rotation aborted at item {item_id}: {reason}")]
    RotationFailed { item_id: i64, reason: String },

    // --- Secret store errors ---
    #[error("Secret store error: {0}")]
    SecretStore(String),

    // --- Server boundary errors ---
    #[error("Server rejected request ({status}): {detail}")]
    Api { status: u16, detail: String },

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for vault-core results.
pub type Result<T> = std::result::Result<T, PassVaultError>;
