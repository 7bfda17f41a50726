//! Integration tests for the session and secret store.

use passvault::crypto::keys::VaultKey;
use passvault::errors::PassVaultError;
use passvault::session::{MemorySecretStore, SecretStore, Session, VaultStatus};

// ---------------------------------------------------------------------------
// Secret store semantics
// ---------------------------------------------------------------------------

#[test]
fn store_is_last_writer_wins() {
    let mut store = MemorySecretStore::new();

    store.set("token", "first").unwrap();
    store.set("token", "second").unwrap();

    assert_eq!(store.get("token").unwrap(), Some("second".to_string()));
}

#[test]
fn get_of_absent_name_is_none() {
    let store = MemorySecretStore::new();
    assert_eq!(store.get("missing").unwrap(), None);
}

#[test]
fn remove_is_idempotent() {
    let mut store = MemorySecretStore::new();
    store.set("token", "value").unwrap();

    store.remove("token").unwrap();
    // Removing an already-absent name is not an error.
    store.remove("token").unwrap();

    assert_eq!(store.get("token").unwrap(), None);
}

// ---------------------------------------------------------------------------
// Session state transitions
// ---------------------------------------------------------------------------

#[test]
fn new_session_starts_locked() {
    let session = Session::in_memory();

    assert_eq!(session.status().unwrap(), VaultStatus::Locked);
    assert!(matches!(
        session.vault_key(),
        Err(PassVaultError::VaultLocked)
    ));
}

#[test]
fn unlock_with_makes_the_key_resident() {
    let mut session = Session::in_memory();
    let key = VaultKey::generate();

    session.unlock_with(&key).unwrap();

    assert_eq!(session.status().unwrap(), VaultStatus::Unlocked);
    assert!(session.vault_key().unwrap() == key);
}

#[test]
fn lock_drops_the_key_but_keeps_tokens() {
    let mut session = Session::in_memory();
    session.unlock_with(&VaultKey::generate()).unwrap();
    session.set_tokens("access", "refresh").unwrap();

    session.lock().unwrap();

    assert_eq!(session.status().unwrap(), VaultStatus::Locked);
    assert_eq!(session.access_token().unwrap(), Some("access".to_string()));
    assert_eq!(
        session.refresh_token().unwrap(),
        Some("refresh".to_string())
    );
}

#[test]
fn clear_removes_key_and_tokens() {
    let mut session = Session::in_memory();
    session.unlock_with(&VaultKey::generate()).unwrap();
    session.set_tokens("access", "refresh").unwrap();

    session.clear().unwrap();

    assert_eq!(session.status().unwrap(), VaultStatus::Locked);
    assert_eq!(session.access_token().unwrap(), None);
    assert_eq!(session.refresh_token().unwrap(), None);
}

#[test]
fn unlock_replaces_a_previous_key() {
    // Last-writer-wins applies to the vault key too — rotation relies on it.
    let mut session = Session::in_memory();
    let old_key = VaultKey::generate();
    let new_key = VaultKey::generate();

    session.unlock_with(&old_key).unwrap();
    session.unlock_with(&new_key).unwrap();

    let resident = session.vault_key().unwrap();
    assert!(resident == new_key);
    assert!(resident != old_key);
}
