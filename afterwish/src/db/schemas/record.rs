//! Record document schemas
//!
//! Singleton documents hold one field mapping per (owner, kind). Item
//! documents hold one entry of a per-owner collection.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

pub const SINGLETON_COLLECTION: &str = "singletons";
pub const ITEM_COLLECTION: &str = "items";

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SingletonDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Identity uid
    pub owner: String,

    /// Record kind key, e.g. `praktische_info`
    pub kind: String,

    #[serde(default)]
    pub fields: Document,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime>,
}

impl IntoIndexes for SingletonDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "owner": 1, "kind": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("owner_kind_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for SingletonDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ItemDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    pub owner: String,

    /// Collection key, e.g. `prive_abonnementen`
    pub collection: String,

    /// Caller-visible item id, unique per (owner, collection)
    pub item_id: String,

    #[serde(default)]
    pub fields: Document,
}

impl IntoIndexes for ItemDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "owner": 1, "collection": 1, "item_id": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("owner_collection_item_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for ItemDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
