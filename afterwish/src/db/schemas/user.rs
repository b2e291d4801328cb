//! User document schema
//!
//! Stores the credentials behind an [`Identity`](crate::auth::Identity).

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::auth::Identity;
use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for users
pub const USER_COLLECTION: &str = "users";

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UserDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Stable principal handle; owns every record of this user
    pub uid: String,

    /// Normalized (trimmed, lowercase) email address
    pub identifier: String,

    #[serde(default = "default_identifier_type")]
    pub identifier_type: String,

    /// Argon2id hash in PHC format
    pub password_hash: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default)]
    pub email_verified: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,

    #[serde(default)]
    pub mfa_enrolled: bool,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_identifier_type() -> String {
    "email".to_string()
}

fn default_true() -> bool {
    true
}

impl UserDoc {
    pub fn new(identifier: String, password_hash: String) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            uid: uuid::Uuid::new_v4().simple().to_string(),
            identifier,
            identifier_type: default_identifier_type(),
            password_hash,
            display_name: None,
            email_verified: false,
            verification_token: None,
            reset_token: None,
            mfa_enrolled: false,
            is_active: true,
        }
    }

    /// The public view handed to the session
    pub fn to_identity(&self) -> Identity {
        Identity {
            uid: self.uid.clone(),
            email: self.identifier.clone(),
            display_name: self.display_name.clone(),
            mfa_enabled: self.mfa_enrolled,
        }
    }
}

impl IntoIndexes for UserDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "identifier": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("identifier_unique".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "uid": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("uid_unique".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for UserDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
