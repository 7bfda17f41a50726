//! Wire payload types exchanged with the backend.
//!
//! The core never performs network I/O itself; the application's request
//! layer serializes these types and owns transport, timeouts, and retries.
//! Field names match the server's schemas exactly. The vault-key fetch
//! response (`{protected_vault_key, protected_vault_key_iv}`) deserializes
//! directly into [`WrappedVaultKey`], and the item list endpoint into
//! `Vec<VaultItem>`.

use serde::{Deserialize, Serialize};

use crate::crypto::keys::AuthHash;
use crate::errors::{PassVaultError, Result};
use crate::vault::item::VaultItem;
use crate::vault::lifecycle::WrappedVaultKey;

/// Registration payload: `POST /auth/register`.
///
/// Serializes to `{email, auth_hash, protected_vault_key,
/// protected_vault_key_iv}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Case-folded account email.
    pub email: String,

    /// The server-side credential check value.
    pub auth_hash: AuthHash,

    /// The wrapped vault key and its IV, flattened into the payload.
    #[serde(flatten)]
    pub wrapped_vault_key: WrappedVaultKey,
}

/// Login payload: `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub auth_hash: AuthHash,
}

/// Login response: the session token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Password-change payload: `POST /auth/password`.
///
/// Carries the new wrapped vault key and **every** vault item re-encrypted
/// under the new key; the server applies the batch as a single transaction
/// or rejects it whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordChangeRequest {
    /// Auth hash for the old password; proves the caller before mutation.
    pub current_auth_hash: AuthHash,

    /// Auth hash for the new password, stored on acceptance.
    pub new_auth_hash: AuthHash,

    /// The new wrapped vault key, base64.
    pub new_protected_vault_key: String,

    /// The new wrap IV, base64.
    pub new_protected_vault_key_iv: String,

    /// All of the account's items, fully re-encrypted.
    pub items: Vec<VaultItem>,
}

/// Error body the server returns on a non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    /// Parse a server error body (`{"detail": "..."}`).
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body)
            .map_err(|e| PassVaultError::Serialization(format!("error body: {e}")))
    }

    /// Turn a server rejection into the crate's opaque API error.
    pub fn into_error(self, status: u16) -> PassVaultError {
        PassVaultError::Api {
            status,
            detail: self.detail,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_uses_server_field_names() {
        let req = RegisterRequest {
            email: "a@b.com".to_string(),
            auth_hash: AuthHash::new("aGFzaA==".to_string()),
            wrapped_vault_key: WrappedVaultKey {
                ciphertext: "Y2lwaGVy".to_string(),
                iv: "aXY=".to_string(),
            },
        };

        let value = serde_json::to_value(&req).unwrap();

        // The wrapped key flattens into the payload under the names the
        // server's schema expects.
        assert_eq!(value["email"], "a@b.com");
        assert_eq!(value["auth_hash"], "aGFzaA==");
        assert_eq!(value["protected_vault_key"], "Y2lwaGVy");
        assert_eq!(value["protected_vault_key_iv"], "aXY=");
    }

    #[test]
    fn wrapped_vault_key_deserializes_from_fetch_response() {
        let body = r#"{"protected_vault_key":"Y2lwaGVy","protected_vault_key_iv":"aXY="}"#;
        let wrapped: WrappedVaultKey = serde_json::from_str(body).unwrap();

        assert_eq!(wrapped.ciphertext, "Y2lwaGVy");
        assert_eq!(wrapped.iv, "aXY=");
    }

    #[test]
    fn password_change_request_carries_all_items() {
        let req = PasswordChangeRequest {
            current_auth_hash: AuthHash::new("b2xk".to_string()),
            new_auth_hash: AuthHash::new("bmV3".to_string()),
            new_protected_vault_key: "a2V5".to_string(),
            new_protected_vault_key_iv: "aXY=".to_string(),
            items: vec![VaultItem {
                id: 1,
                site: "example.com".to_string(),
                encrypted_password: "Y3Q=".to_string(),
                owner: 7,
            }],
        };

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["items"].as_array().unwrap().len(), 1);
        assert_eq!(value["items"][0]["site"], "example.com");
        assert_eq!(value["new_protected_vault_key"], "a2V5");
    }

    #[test]
    fn error_response_maps_to_api_error() {
        let body = ErrorResponse::from_json(r#"{"detail":"Email already registered"}"#).unwrap();
        let err = body.into_error(400);

        match err {
            PassVaultError::Api { status, detail } => {
                assert_eq!(status, 400);
                assert_eq!(detail, "Email already registered");
            }
            other => panic!("expected Api error, got {other}"),
        }
    }
}
