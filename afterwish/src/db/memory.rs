//! In-process record store
//!
//! Used by the test suite and by development mode when MongoDB is
//! unreachable. Contents live as long as the process.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::{DocumentStore, Fields, StoredItem, UpsertOutcome};
use crate::types::StoreError;

type Key = (String, String);

#[derive(Debug, Default)]
pub struct MemoryStore {
    singletons: RwLock<HashMap<Key, Fields>>,
    items: RwLock<HashMap<Key, BTreeMap<String, Fields>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn key(owner: &str, name: &str) -> Key {
    (owner.to_string(), name.to_string())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn merge_singleton(
        &self,
        owner: &str,
        kind: &str,
        fields: Fields,
        _stamped_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut singletons = self.singletons.write().await;
        let stored = singletons.entry(key(owner, kind)).or_default();
        stored.extend(fields);
        debug!(owner, kind, fields = stored.len(), "Merged singleton");
        Ok(())
    }

    async fn get_singleton(&self, owner: &str, kind: &str) -> Result<Option<Fields>, StoreError> {
        Ok(self.singletons.read().await.get(&key(owner, kind)).cloned())
    }

    async fn upsert_item(
        &self,
        owner: &str,
        collection: &str,
        id: Option<&str>,
        fields: Fields,
    ) -> Result<UpsertOutcome, StoreError> {
        let mut items = self.items.write().await;
        let bucket = items.entry(key(owner, collection)).or_default();

        let id = match id {
            Some(id) => id.to_string(),
            None => uuid::Uuid::new_v4().simple().to_string(),
        };

        let outcome = if bucket.insert(id.clone(), fields).is_some() {
            UpsertOutcome::Updated(id)
        } else {
            UpsertOutcome::Created(id)
        };
        debug!(owner, collection, ?outcome, "Upserted item");
        Ok(outcome)
    }

    async fn list_items(&self, owner: &str, collection: &str) -> Result<Vec<StoredItem>, StoreError> {
        Ok(self
            .items
            .read()
            .await
            .get(&key(owner, collection))
            .map(|bucket| {
                bucket
                    .iter()
                    .map(|(id, fields)| StoredItem {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete_item(&self, owner: &str, collection: &str, id: &str) -> Result<(), StoreError> {
        if let Some(bucket) = self.items.write().await.get_mut(&key(owner, collection)) {
            bucket.remove(id);
        }
        Ok(())
    }
}
