//! Document storage for user records
//!
//! [`DocumentStore`] is the seam between the record client and a backend.
//! Singleton writes are merges; item writes are full-document upserts.

pub mod memory;
pub mod mongo;
pub mod schemas;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::types::StoreError;

pub use memory::MemoryStore;
pub use mongo::{MongoClient, MongoCollection, MongoStore, MongoUserDirectory};

/// A flat mapping of field names to values, as stored
pub type Fields = Map<String, Value>;

/// An item as returned by a backend
#[derive(Debug, Clone, PartialEq)]
pub struct StoredItem {
    pub id: String,
    pub fields: Fields,
}

/// What an item upsert did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(String),
    Updated(String),
}

impl UpsertOutcome {
    pub fn id(&self) -> &str {
        match self {
            Self::Created(id) | Self::Updated(id) => id,
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Merge `fields` into the singleton document, creating it when absent.
    /// Fields missing from `fields` keep their stored value.
    async fn merge_singleton(
        &self,
        owner: &str,
        kind: &str,
        fields: Fields,
        stamped_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    async fn get_singleton(&self, owner: &str, kind: &str) -> Result<Option<Fields>, StoreError>;

    /// Create or replace an item. Without an id the backend generates one.
    async fn upsert_item(
        &self,
        owner: &str,
        collection: &str,
        id: Option<&str>,
        fields: Fields,
    ) -> Result<UpsertOutcome, StoreError>;

    async fn list_items(&self, owner: &str, collection: &str) -> Result<Vec<StoredItem>, StoreError>;

    /// Remove an item; removing an absent item succeeds.
    async fn delete_item(&self, owner: &str, collection: &str, id: &str) -> Result<(), StoreError>;
}
