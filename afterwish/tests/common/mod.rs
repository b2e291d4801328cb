//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use afterwish::auth::Identity;
use afterwish::db::{DocumentStore, Fields, MemoryStore, StoredItem, UpsertOutcome};
use afterwish::records::{AccessMode, RecordClient};
use afterwish::types::StoreError;

/// In-memory store that counts calls and can be told to reject writes
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
    reject_writes: AtomicBool,
}

impl CountingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub fn client(self: &Arc<Self>) -> RecordClient {
        RecordClient::new(self.clone(), AccessMode::Lenient)
    }

    fn write(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Database("write rejected".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn merge_singleton(
        &self,
        owner: &str,
        kind: &str,
        fields: Fields,
        stamped_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.write()?;
        self.inner.merge_singleton(owner, kind, fields, stamped_at).await
    }

    async fn get_singleton(&self, owner: &str, kind: &str) -> Result<Option<Fields>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_singleton(owner, kind).await
    }

    async fn upsert_item(
        &self,
        owner: &str,
        collection: &str,
        id: Option<&str>,
        fields: Fields,
    ) -> Result<UpsertOutcome, StoreError> {
        self.write()?;
        self.inner.upsert_item(owner, collection, id, fields).await
    }

    async fn list_items(&self, owner: &str, collection: &str) -> Result<Vec<StoredItem>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_items(owner, collection).await
    }

    async fn delete_item(&self, owner: &str, collection: &str, id: &str) -> Result<(), StoreError> {
        self.write()?;
        self.inner.delete_item(owner, collection, id).await
    }
}

pub fn identity(uid: &str) -> Identity {
    Identity {
        uid: uid.to_string(),
        email: format!("{}@example.nl", uid),
        display_name: None,
        mfa_enabled: false,
    }
}
