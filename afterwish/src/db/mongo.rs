//! MongoDB client, collection wrapper and record backend
//!
//! Deletes remove documents outright; nothing is kept after `delete_item`.

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson, DateTime, Document};
use futures::StreamExt;
use mongodb::{
    options::{IndexOptions, UpdateModifications},
    results::{DeleteResult, UpdateResult},
    Client, Collection, IndexModel,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use super::schemas::{
    ItemDoc, Metadata, SingletonDoc, UserDoc, ITEM_COLLECTION, SINGLETON_COLLECTION,
    USER_COLLECTION,
};
use super::{DocumentStore, Fields, StoredItem, UpsertOutcome};
use crate::auth::UserDirectory;
use crate::types::StoreError;

/// Trait for schemas that provide index definitions
pub trait IntoIndexes {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)>;
}

/// Trait for schemas with mutable metadata
pub trait MutMetadata {
    fn mut_metadata(&mut self) -> &mut Metadata;
}

#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Connect and ping; fails fast when the server is unreachable
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, StoreError> {
        info!("Connecting to MongoDB at {}", uri);

        let timeout_uri = if uri.contains('?') {
            format!("{}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        } else {
            format!("{}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        client
            .database(db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Database(format!("MongoDB ping failed: {}", e)))?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    /// Get a typed collection with its indexes applied
    pub async fn collection<T>(&self, name: &str) -> Result<MongoCollection<T>, StoreError>
    where
        T: Serialize + DeserializeOwned + Unpin + Send + Sync + Default + IntoIndexes + MutMetadata,
    {
        MongoCollection::new(&self.client, &self.db_name, name).await
    }
}

/// Typed MongoDB collection with automatic indexing
#[derive(Debug, Clone)]
pub struct MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    inner: Collection<T>,
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + Default + IntoIndexes + MutMetadata,
{
    pub async fn new(
        client: &Client,
        db_name: &str,
        collection_name: &str,
    ) -> Result<Self, StoreError> {
        let collection = client.database(db_name).collection::<T>(collection_name);
        let mongo_collection = MongoCollection { inner: collection };

        mongo_collection.apply_indexes().await?;

        Ok(mongo_collection)
    }

    async fn apply_indexes(&self) -> Result<(), StoreError> {
        let schema_indices = T::into_indices();

        if schema_indices.is_empty() {
            return Ok(());
        }

        let indices: Vec<IndexModel> = schema_indices
            .into_iter()
            .map(|(keys, opts)| IndexModel::builder().keys(keys).options(opts).build())
            .collect();

        self.inner
            .create_indexes(indices)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to create indexes: {}", e)))?;

        Ok(())
    }

    /// Insert a document, setting metadata timestamps
    pub async fn insert_one(&self, mut item: T) -> Result<ObjectId, StoreError> {
        *item.mut_metadata() = Metadata::new();

        let result = self.inner.insert_one(item).await.map_err(|e| {
            let message = e.to_string();
            if is_duplicate_key(&message) {
                StoreError::Conflict(message)
            } else {
                StoreError::Database(format!("Insert failed: {}", message))
            }
        })?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Database("Failed to get inserted ID".into()))
    }

    pub async fn find_one(&self, filter: Document) -> Result<Option<T>, StoreError> {
        self.inner
            .find_one(filter)
            .await
            .map_err(|e| StoreError::Database(format!("Find failed: {}", e)))
    }

    /// Find documents by filter; unreadable documents are logged and skipped
    pub async fn find_many(&self, filter: Document) -> Result<Vec<T>, StoreError> {
        let cursor = self
            .inner
            .find(filter)
            .await
            .map_err(|e| StoreError::Database(format!("Find failed: {}", e)))?;

        let results: Vec<T> = cursor
            .filter_map(|doc| async {
                match doc {
                    Ok(d) => Some(d),
                    Err(e) => {
                        error!("Error reading document: {}", e);
                        None
                    }
                }
            })
            .collect()
            .await;

        Ok(results)
    }

    pub async fn update_one(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult, StoreError> {
        self.inner
            .update_one(filter, update.into())
            .await
            .map_err(|e| StoreError::Database(format!("Update failed: {}", e)))
    }

    /// Update the matching document, inserting it when none matches
    pub async fn upsert_one(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult, StoreError> {
        self.inner
            .update_one(filter, update.into())
            .upsert(true)
            .await
            .map_err(|e| StoreError::Database(format!("Upsert failed: {}", e)))
    }

    pub async fn delete_one(&self, filter: Document) -> Result<DeleteResult, StoreError> {
        self.inner
            .delete_one(filter)
            .await
            .map_err(|e| StoreError::Database(format!("Delete failed: {}", e)))
    }
}

fn is_duplicate_key(message: &str) -> bool {
    message.contains("E11000")
}

/// Convert a field mapping to BSON, rejecting names MongoDB would interpret
/// as paths or operators.
pub(crate) fn fields_to_document(fields: &Fields) -> Result<Document, StoreError> {
    let mut document = Document::new();
    for (name, value) in fields {
        if name.is_empty() || name.contains('.') || name.starts_with('$') {
            return Err(StoreError::InvalidRecord(format!(
                "field name '{}' is not storable",
                name
            )));
        }
        document.insert(name.clone(), bson::to_bson(value)?);
    }
    Ok(document)
}

pub(crate) fn fields_from_document(document: Document) -> Fields {
    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}

/// `$set` every field under `fields.<name>` so the server merges them
/// into the stored mapping.
pub(crate) fn singleton_merge_update(
    fields: &Fields,
    stamped_at: chrono::DateTime<chrono::Utc>,
) -> Result<Document, StoreError> {
    let stamp = DateTime::from_chrono(stamped_at);
    let mut set = Metadata::touched(stamp);
    set.insert("last_updated", stamp);
    for (name, value) in fields_to_document(fields)? {
        set.insert(format!("fields.{}", name), value);
    }
    Ok(doc! {
        "$set": set,
        "$setOnInsert": Metadata::created(stamp),
    })
}

pub(crate) fn item_replace_update(fields: &Fields) -> Result<Document, StoreError> {
    let now = DateTime::now();
    let mut set = Metadata::touched(now);
    set.insert("fields", fields_to_document(fields)?);
    Ok(doc! {
        "$set": set,
        "$setOnInsert": Metadata::created(now),
    })
}

/// Selects exactly one item; shared by upsert and delete
pub(crate) fn item_filter(owner: &str, collection: &str, id: &str) -> Document {
    doc! { "owner": owner, "collection": collection, "item_id": id }
}

/// Record backend over the `singletons` and `items` collections
#[derive(Clone)]
pub struct MongoStore {
    singletons: MongoCollection<SingletonDoc>,
    items: MongoCollection<ItemDoc>,
}

impl MongoStore {
    pub async fn new(client: &MongoClient) -> Result<Self, StoreError> {
        Ok(Self {
            singletons: client.collection(SINGLETON_COLLECTION).await?,
            items: client.collection(ITEM_COLLECTION).await?,
        })
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn merge_singleton(
        &self,
        owner: &str,
        kind: &str,
        fields: Fields,
        stamped_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), StoreError> {
        let update = singleton_merge_update(&fields, stamped_at)?;
        let result = self
            .singletons
            .upsert_one(doc! { "owner": owner, "kind": kind }, update)
            .await?;
        debug!(owner, kind, created = result.upserted_id.is_some(), "Merged singleton");
        Ok(())
    }

    async fn get_singleton(&self, owner: &str, kind: &str) -> Result<Option<Fields>, StoreError> {
        Ok(self
            .singletons
            .find_one(doc! { "owner": owner, "kind": kind })
            .await?
            .map(|singleton| fields_from_document(singleton.fields)))
    }

    async fn upsert_item(
        &self,
        owner: &str,
        collection: &str,
        id: Option<&str>,
        fields: Fields,
    ) -> Result<UpsertOutcome, StoreError> {
        let id = match id {
            Some(id) => id.to_string(),
            None => ObjectId::new().to_hex(),
        };
        let update = item_replace_update(&fields)?;
        let result = self
            .items
            .upsert_one(item_filter(owner, collection, &id), update)
            .await?;

        Ok(if result.upserted_id.is_some() {
            UpsertOutcome::Created(id)
        } else {
            UpsertOutcome::Updated(id)
        })
    }

    async fn list_items(&self, owner: &str, collection: &str) -> Result<Vec<StoredItem>, StoreError> {
        Ok(self
            .items
            .find_many(doc! { "owner": owner, "collection": collection })
            .await?
            .into_iter()
            .map(|item| StoredItem {
                id: item.item_id,
                fields: fields_from_document(item.fields),
            })
            .collect())
    }

    async fn delete_item(&self, owner: &str, collection: &str, id: &str) -> Result<(), StoreError> {
        let result = self
            .items
            .delete_one(item_filter(owner, collection, id))
            .await?;
        debug!(owner, collection, id, removed = result.deleted_count, "Deleted item");
        Ok(())
    }
}

/// User directory over the `users` collection
#[derive(Clone)]
pub struct MongoUserDirectory {
    users: MongoCollection<UserDoc>,
}

impl MongoUserDirectory {
    pub async fn new(client: &MongoClient) -> Result<Self, StoreError> {
        Ok(Self {
            users: client.collection(USER_COLLECTION).await?,
        })
    }
}

#[async_trait]
impl UserDirectory for MongoUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserDoc>, StoreError> {
        self.users.find_one(doc! { "identifier": email }).await
    }

    async fn insert(&self, user: UserDoc) -> Result<(), StoreError> {
        self.users.insert_one(user).await.map(|_| ())
    }

    async fn update(&self, user: &UserDoc) -> Result<(), StoreError> {
        self.users
            .update_one(doc! { "uid": &user.uid }, user_update(user)?)
            .await?;
        Ok(())
    }
}

/// Optional user fields that must be removed, not skipped, when cleared
const CLEARABLE_USER_FIELDS: [&str; 3] = ["display_name", "verification_token", "reset_token"];

pub(crate) fn user_update(user: &UserDoc) -> Result<Document, StoreError> {
    let mut set = bson::to_document(user)?;
    set.remove("_id");
    set.remove("metadata");
    for (path, stamp) in Metadata::touched(DateTime::now()) {
        set.insert(path, stamp);
    }

    let mut unset = Document::new();
    for name in CLEARABLE_USER_FIELDS {
        if !set.contains_key(name) {
            unset.insert(name, "");
        }
    }

    let mut update = doc! { "$set": set };
    if !unset.is_empty() {
        update.insert("$unset", unset);
    }
    Ok(update)
}
