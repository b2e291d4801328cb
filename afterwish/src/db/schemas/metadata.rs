//! Creation and update stamps carried by every stored document

use bson::{doc, DateTime, Document};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::stamped(DateTime::now())
    }

    pub fn stamped(at: DateTime) -> Self {
        Self {
            created_at: Some(at),
            updated_at: Some(at),
        }
    }

    /// `$set` paths for a write at `at`
    pub fn touched(at: DateTime) -> Document {
        doc! { "metadata.updated_at": at }
    }

    /// `$setOnInsert` paths for an upsert at `at`
    pub fn created(at: DateTime) -> Document {
        doc! { "metadata.created_at": at }
    }
}
