use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;

use crate::record::{next_id, PasswordRecord};

/// Errors produced by record store implementations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No record carries the requested id.
    #[error("no password entry with id {id}")]
    NotFound { id: u64 },
    /// Underlying persistence failure.
    #[error("storage failure: {reason}")]
    Storage { reason: String },
}

/// Contract for the durable, ordered list of password records.
///
/// Implementations reload their backing resource for every operation and
/// serialize mutations against concurrent in-process callers, so two
/// simultaneous `add` calls can never hand out the same id or drop an
/// insertion.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Append a record, assigning the next free id and the current time.
    async fn add(
        &self,
        site: &str,
        username: &str,
        encrypted_password: &str,
    ) -> Result<PasswordRecord, StoreError>;

    /// Remove the record with the given id, preserving the order of the
    /// rest. The store is left untouched when the id is unknown.
    async fn remove(&self, id: u64) -> Result<(), StoreError>;

    /// All records in stored order, ciphertext as-is.
    async fn list(&self) -> Result<Vec<PasswordRecord>, StoreError>;
}

/// In-memory store for tests and ephemeral runs. Clones share state.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRecordStore {
    inner: Arc<Mutex<Vec<PasswordRecord>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn add(
        &self,
        site: &str,
        username: &str,
        encrypted_password: &str,
    ) -> Result<PasswordRecord, StoreError> {
        let mut records = self.inner.lock().map_err(|err| StoreError::Storage {
            reason: format!("lock poisoned: {err}"),
        })?;

        let record = PasswordRecord::new(
            next_id(&records),
            site.to_string(),
            username.to_string(),
            encrypted_password.to_string(),
        );
        records.push(record.clone());
        Ok(record)
    }

    async fn remove(&self, id: u64) -> Result<(), StoreError> {
        let mut records = self.inner.lock().map_err(|err| StoreError::Storage {
            reason: format!("lock poisoned: {err}"),
        })?;

        let index = records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound { id })?;
        records.remove(index);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<PasswordRecord>, StoreError> {
        let records = self.inner.lock().map_err(|err| StoreError::Storage {
            reason: format!("lock poisoned: {err}"),
        })?;
        Ok(records.clone())
    }
}
