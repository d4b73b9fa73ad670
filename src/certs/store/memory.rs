//! In-memory record store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::RecordStore;
use crate::certs::error::StoreError;
use crate::certs::record::{Record, RecordIdentifier};

/// Map-backed store shared between clones.
///
/// Counts `create` and `update` calls, including rejected ones, so tests can
/// assert that no write reached the backend.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    inner: Arc<RwLock<HashMap<RecordIdentifier, Record>>>,
    creates: Arc<AtomicUsize>,
    updates: Arc<AtomicUsize>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly, bypassing the counters.
    pub async fn insert(&self, record: Record) {
        self.inner.write().await.insert(record.identifier.clone(), record);
    }

    /// Current record at `identifier`, if any.
    pub async fn snapshot(&self, identifier: &RecordIdentifier) -> Option<Record> {
        self.inner.read().await.get(identifier).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(&self, identifier: &RecordIdentifier) -> Result<Record, StoreError> {
        self.inner
            .read()
            .await
            .get(identifier)
            .cloned()
            .ok_or_else(|| StoreError::not_found(identifier))
    }

    async fn create(&self, record: &Record) -> Result<(), StoreError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        let mut records = self.inner.write().await;

        if records.contains_key(&record.identifier) {
            return Err(StoreError::already_exists(&record.identifier));
        }

        debug!(record = %record.identifier, "Created in-memory record");
        records.insert(record.identifier.clone(), record.clone());
        Ok(())
    }

    async fn update(&self, record: &Record) -> Result<(), StoreError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let mut records = self.inner.write().await;

        match records.get_mut(&record.identifier) {
            Some(existing) => {
                *existing = record.clone();
                debug!(record = %record.identifier, "Updated in-memory record");
                Ok(())
            }
            None => Err(StoreError::not_found(&record.identifier)),
        }
    }
}
