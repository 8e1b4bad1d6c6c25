use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::instrument;
use zengate_core::{
    record::{next_id, PasswordRecord},
    store::{RecordStore, StoreError},
};

/// JSON-file-backed password store.
///
/// The file is the sole source of truth: every operation reloads it, so
/// edits made between invocations are always picked up. Mutations hold an
/// in-process lock around the whole load-mutate-save sequence. Concurrent
/// *processes* writing the same file are not coordinated; the last writer
/// wins, which is an accepted limitation of this persistence strategy.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

/// Persisted shape: `{ "passwords": [ ... ] }`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PasswordDocument {
    passwords: Vec<PasswordRecord>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_document(&self) -> Result<PasswordDocument, StoreError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            // First use needs no init: a missing file is an empty store.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(PasswordDocument::default())
            }
            Err(err) => return Err(storage_err(err)),
        };
        serde_json::from_slice(&data).map_err(storage_err)
    }

    /// Write the whole document, atomically from the reader's point of
    /// view: serialize into a temp file next to the target, then persist
    /// over it. A failed save never leaves a truncated file behind.
    fn save_document(&self, document: &PasswordDocument) -> Result<(), StoreError> {
        let parent = self.path.parent().ok_or_else(|| StoreError::Storage {
            reason: "invalid storage path".to_string(),
        })?;
        fs::create_dir_all(parent).map_err(storage_err)?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(storage_err)?;
        let json = serde_json::to_vec_pretty(document).map_err(storage_err)?;
        tmp.write_all(&json).map_err(storage_err)?;
        tmp.flush().map_err(storage_err)?;
        tmp.persist(&self.path).map_err(|e| storage_err(e.error))?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, StoreError> {
        self.write_lock.lock().map_err(|err| StoreError::Storage {
            reason: format!("lock poisoned: {err}"),
        })
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    #[instrument(skip_all, fields(site))]
    async fn add(
        &self,
        site: &str,
        username: &str,
        encrypted_password: &str,
    ) -> Result<PasswordRecord, StoreError> {
        let _guard = self.lock()?;

        let mut document = self.load_document()?;
        let record = PasswordRecord::new(
            next_id(&document.passwords),
            site.to_string(),
            username.to_string(),
            encrypted_password.to_string(),
        );
        document.passwords.push(record.clone());
        self.save_document(&document)?;
        Ok(record)
    }

    #[instrument(skip_all, fields(id))]
    async fn remove(&self, id: u64) -> Result<(), StoreError> {
        let _guard = self.lock()?;

        let mut document = self.load_document()?;
        let index = document
            .passwords
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound { id })?;
        document.passwords.remove(index);
        self.save_document(&document)
    }

    #[instrument(skip_all)]
    async fn list(&self) -> Result<Vec<PasswordRecord>, StoreError> {
        Ok(self.load_document()?.passwords)
    }
}

fn storage_err<E: ToString>(err: E) -> StoreError {
    StoreError::Storage {
        reason: err.to_string(),
    }
}
