//! The password vault service: composes the configured key, the envelope
//! cipher, and a record store into the user-facing add/list/remove
//! operations. Plaintext passwords exist only inside a single call here;
//! everything that reaches the store is already encrypted.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{instrument, warn};
use zengate_core::{
    record::PasswordRecord,
    store::{RecordStore, StoreError},
};
use zengate_crypto::{
    cipher::{self, CipherError},
    key::{EncryptionKey, KeyError},
};

/// Shown in place of a password that could not be decrypted.
pub const DECRYPTION_FAILED: &str = "<decryption failed>";

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("no encryption key configured; run `zengate set encrypt_key <key>` first")]
    NoKeyConfigured,
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error(transparent)]
    Cipher(#[from] CipherError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A record with its plaintext recovered for display. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedRecord {
    pub id: u64,
    pub site: String,
    pub username: String,
    pub password: String,
    pub created: DateTime<Utc>,
}

pub struct PasswordVault<S: RecordStore> {
    store: Arc<S>,
    encoded_key: Option<String>,
}

impl<S: RecordStore> PasswordVault<S> {
    /// `encoded_key` is the key string as configured, possibly absent or
    /// invalid; it is decoded per operation, not here.
    pub fn new(store: S, encoded_key: Option<String>) -> Self {
        Self {
            store: Arc::new(store),
            encoded_key,
        }
    }

    // Decoded on every call rather than cached, so a key that skipped the
    // `set` validation still fails closed at use time.
    fn key(&self) -> Result<EncryptionKey, VaultError> {
        let encoded = self
            .encoded_key
            .as_deref()
            .ok_or(VaultError::NoKeyConfigured)?;
        Ok(EncryptionKey::from_base64(encoded)?)
    }

    /// Encrypt `plaintext` and append it as a new record.
    #[instrument(skip_all, fields(site))]
    pub async fn add_password(
        &self,
        site: &str,
        username: &str,
        plaintext: &str,
    ) -> Result<PasswordRecord, VaultError> {
        let key = self.key()?;
        let envelope = cipher::encrypt(plaintext, &key)?;
        Ok(self.store.add(site, username, &envelope).await?)
    }

    /// All records with passwords decrypted for display. A record that
    /// fails to decrypt gets the [`DECRYPTION_FAILED`] sentinel instead of
    /// aborting the listing.
    #[instrument(skip_all)]
    pub async fn list_decrypted(&self) -> Result<Vec<DecryptedRecord>, VaultError> {
        let key = self.key()?;
        let records = self.store.list().await?;
        Ok(records
            .into_iter()
            .map(|record| decrypt_for_display(record, &key))
            .collect())
    }

    /// Remove a record by id. Unknown ids surface as [`StoreError::NotFound`].
    #[instrument(skip_all, fields(id))]
    pub async fn remove(&self, id: u64) -> Result<(), VaultError> {
        Ok(self.store.remove(id).await?)
    }
}

fn decrypt_for_display(record: PasswordRecord, key: &EncryptionKey) -> DecryptedRecord {
    let password = match cipher::decrypt(&record.password, key) {
        Ok(plaintext) => plaintext,
        Err(err) => {
            warn!(id = record.id, %err, "failed to decrypt entry");
            DECRYPTION_FAILED.to_string()
        }
    };
    DecryptedRecord {
        id: record.id,
        site: record.site,
        username: record.username,
        password,
        created: record.created,
    }
}

#[cfg(test)]
mod tests {
    use zengate_core::store::InMemoryRecordStore;

    use super::*;

    fn keyed_vault(store: InMemoryRecordStore) -> (PasswordVault<InMemoryRecordStore>, EncryptionKey) {
        let key = EncryptionKey::generate();
        let vault = PasswordVault::new(store, Some(key.to_base64()));
        (vault, key)
    }

    #[tokio::test]
    async fn stores_only_ciphertext() {
        let store = InMemoryRecordStore::new();
        let (vault, key) = keyed_vault(store.clone());

        vault
            .add_password("github.com", "johndoe", "hunter2")
            .await
            .expect("add");

        let raw = store.list().await.expect("list");
        assert_ne!(raw[0].password, "hunter2");
        assert_eq!(cipher::decrypt(&raw[0].password, &key).expect("decrypt"), "hunter2");
    }

    #[tokio::test]
    async fn lists_decrypted_passwords() {
        let (vault, _key) = keyed_vault(InMemoryRecordStore::new());
        vault.add_password("a", "u", "one").await.expect("add");
        vault.add_password("b", "u", "two").await.expect("add");

        let listed = vault.list_decrypted().await.expect("list");
        let passwords: Vec<&str> = listed.iter().map(|r| r.password.as_str()).collect();
        assert_eq!(passwords, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn one_corrupted_record_does_not_abort_the_listing() {
        let store = InMemoryRecordStore::new();
        let (vault, _key) = keyed_vault(store.clone());

        vault.add_password("first", "u", "one").await.expect("add");
        store
            .add("second", "u", "not-an-envelope")
            .await
            .expect("add raw");
        vault.add_password("third", "u", "three").await.expect("add");

        let listed = vault.list_decrypted().await.expect("list");
        let passwords: Vec<&str> = listed.iter().map(|r| r.password.as_str()).collect();
        assert_eq!(passwords, vec!["one", DECRYPTION_FAILED, "three"]);
    }

    #[tokio::test]
    async fn operations_require_a_configured_key() {
        let vault = PasswordVault::new(InMemoryRecordStore::new(), None);

        let err = vault
            .add_password("site", "u", "pw")
            .await
            .expect_err("add should fail");
        assert!(matches!(err, VaultError::NoKeyConfigured));

        let err = vault.list_decrypted().await.expect_err("list should fail");
        assert!(matches!(err, VaultError::NoKeyConfigured));
    }

    #[tokio::test]
    async fn invalid_configured_key_fails_closed() {
        let vault = PasswordVault::new(
            InMemoryRecordStore::new(),
            Some("not base64!!!".to_string()),
        );

        let err = vault
            .add_password("site", "u", "pw")
            .await
            .expect_err("add should fail");
        assert!(matches!(err, VaultError::Key(KeyError::InvalidEncoding)));
    }

    #[tokio::test]
    async fn remove_surfaces_not_found() {
        let (vault, _key) = keyed_vault(InMemoryRecordStore::new());
        let err = vault.remove(7).await.expect_err("should fail");
        assert!(matches!(
            err,
            VaultError::Store(StoreError::NotFound { id: 7 })
        ));
    }
}
