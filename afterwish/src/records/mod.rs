//! Record store client
//!
//! Every form and list owns one [`RecordClient`]. Each call names the
//! identity it acts for; without one the call is skipped (lenient) or
//! refused (strict).

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::Identity;
use crate::db::{DocumentStore, Fields, UpsertOutcome};
use crate::status::{OperationStatus, StatusTracker};
use crate::types::StoreError;

/// Field every singleton save stamps
pub const LAST_UPDATED_FIELD: &str = "lastUpdated";

/// Field carrying an item's id in client-side records
pub const ID_FIELD: &str = "id";

/// What to do when a call arrives without an identity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccessMode {
    /// Skip silently: loads yield nothing, writes do nothing
    #[default]
    Lenient,
    /// Fail with [`StoreError::Unauthenticated`]
    Strict,
}

/// One-per-identity record kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SingletonKind {
    PracticalInfo,
    WishList,
}

impl SingletonKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PracticalInfo => "praktische_info",
            Self::WishList => "wish_list",
        }
    }
}

/// Per-identity item collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    BusinessSubscriptions,
    PrivateSubscriptions,
}

impl CollectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BusinessSubscriptions => "zakelijk_abonnementen",
            Self::PrivateSubscriptions => "prive_abonnementen",
        }
    }
}

pub struct RecordClient {
    store: Arc<dyn DocumentStore>,
    mode: AccessMode,
    status: StatusTracker,
}

impl RecordClient {
    pub fn new(store: Arc<dyn DocumentStore>, mode: AccessMode) -> Self {
        Self {
            store,
            mode,
            status: StatusTracker::new(),
        }
    }

    pub fn status(&self) -> OperationStatus {
        self.status.current()
    }

    /// Resolve the owner uid, or decide what a call without one does
    fn owner<'a>(&self, who: Option<&'a Identity>, op: &str) -> Result<Option<&'a str>, StoreError> {
        match (who, self.mode) {
            (Some(identity), _) => Ok(Some(identity.uid.as_str())),
            (None, AccessMode::Lenient) => {
                debug!(op, "No identity, skipping store call");
                Ok(None)
            }
            (None, AccessMode::Strict) => {
                warn!(op, "No identity, refusing store call");
                let err = StoreError::Unauthenticated;
                self.status.fail(err.to_string());
                Err(err)
            }
        }
    }

    /// Merge `fields` into the singleton for `kind`, stamping `lastUpdated`.
    ///
    /// Returns the stamp, or `None` when skipped for lack of identity.
    pub async fn save_singleton(
        &self,
        who: Option<&Identity>,
        kind: SingletonKind,
        mut fields: Fields,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        let Some(owner) = self.owner(who, "save_singleton")? else {
            return Ok(None);
        };

        let stamped_at = Utc::now();
        fields.insert(
            LAST_UPDATED_FIELD.to_string(),
            Value::String(stamped_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );

        self.status.begin();
        let result = self
            .store
            .merge_singleton(owner, kind.as_str(), fields, stamped_at)
            .await;
        self.status.finish(&result);
        if let Err(e) = &result {
            warn!(kind = kind.as_str(), error = %e, "Saving record failed");
        }
        result.map(|_| Some(stamped_at))
    }

    pub async fn load_singleton(
        &self,
        who: Option<&Identity>,
        kind: SingletonKind,
    ) -> Result<Option<Fields>, StoreError> {
        let Some(owner) = self.owner(who, "load_singleton")? else {
            return Ok(None);
        };

        self.status.begin();
        let result = self.store.get_singleton(owner, kind.as_str()).await;
        self.status.finish(&result);
        if let Err(e) = &result {
            warn!(kind = kind.as_str(), error = %e, "Loading record failed");
        }
        result
    }

    /// Create or replace a whole item.
    ///
    /// The `id` field, when present, addresses the item; otherwise the store
    /// assigns one. The id never becomes part of the stored fields.
    pub async fn upsert_item(
        &self,
        who: Option<&Identity>,
        kind: CollectionKind,
        mut item: Fields,
    ) -> Result<Option<UpsertOutcome>, StoreError> {
        let Some(owner) = self.owner(who, "upsert_item")? else {
            return Ok(None);
        };

        let id = match item.remove(ID_FIELD) {
            Some(Value::String(id)) if !id.is_empty() => Some(id),
            Some(Value::String(_)) | Some(Value::Null) | None => None,
            Some(other) => {
                let err = StoreError::InvalidRecord(format!("item id must be a string, got {}", other));
                self.status.fail(err.to_string());
                return Err(err);
            }
        };

        self.status.begin();
        let result = self
            .store
            .upsert_item(owner, kind.as_str(), id.as_deref(), item)
            .await;
        self.status.finish(&result);
        match &result {
            Ok(outcome) => debug!(collection = kind.as_str(), ?outcome, "Item stored"),
            Err(e) => warn!(collection = kind.as_str(), error = %e, "Storing item failed"),
        }
        result.map(Some)
    }

    /// All items of `kind`, each with its `id` field filled in
    pub async fn list_items(
        &self,
        who: Option<&Identity>,
        kind: CollectionKind,
    ) -> Result<Vec<Fields>, StoreError> {
        let Some(owner) = self.owner(who, "list_items")? else {
            return Ok(Vec::new());
        };

        self.status.begin();
        let result = self.store.list_items(owner, kind.as_str()).await;
        self.status.finish(&result);
        if let Err(e) = &result {
            warn!(collection = kind.as_str(), error = %e, "Listing items failed");
        }

        Ok(result?
            .into_iter()
            .map(|stored| {
                let mut fields = stored.fields;
                fields.insert(ID_FIELD.to_string(), Value::String(stored.id));
                fields
            })
            .collect())
    }

    pub async fn delete_item(
        &self,
        who: Option<&Identity>,
        kind: CollectionKind,
        id: &str,
    ) -> Result<(), StoreError> {
        let Some(owner) = self.owner(who, "delete_item")? else {
            return Ok(());
        };

        self.status.begin();
        let result = self.store.delete_item(owner, kind.as_str(), id).await;
        self.status.finish(&result);
        if let Err(e) = &result {
            warn!(collection = kind.as_str(), id, error = %e, "Deleting item failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use serde_json::json;

    fn anna() -> Identity {
        Identity {
            uid: "anna".into(),
            email: "anna@example.nl".into(),
            display_name: None,
            mfa_enabled: false,
        }
    }

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    fn client(mode: AccessMode) -> RecordClient {
        RecordClient::new(Arc::new(MemoryStore::new()), mode)
    }

    #[tokio::test]
    async fn test_save_then_load_is_superset() {
        let client = client(AccessMode::Lenient);
        let who = anna();

        client
            .save_singleton(Some(&who), SingletonKind::PracticalInfo, fields(json!({"bsn": "123456789"})))
            .await
            .unwrap();
        let stamp = client
            .save_singleton(Some(&who), SingletonKind::PracticalInfo, fields(json!({"woonplaats": "Utrecht"})))
            .await
            .unwrap();
        assert!(stamp.is_some());

        let stored = client
            .load_singleton(Some(&who), SingletonKind::PracticalInfo)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored["bsn"], "123456789");
        assert_eq!(stored["woonplaats"], "Utrecht");
        assert!(stored[LAST_UPDATED_FIELD].is_string());
    }

    #[tokio::test]
    async fn test_repeated_save_only_moves_the_stamp() {
        let client = client(AccessMode::Lenient);
        let who = anna();
        let values = fields(json!({"bsn": "123456789", "testament": true, "notaris": "Mr. de Vries"}));

        client
            .save_singleton(Some(&who), SingletonKind::PracticalInfo, values.clone())
            .await
            .unwrap();
        let mut first = client
            .load_singleton(Some(&who), SingletonKind::PracticalInfo)
            .await
            .unwrap()
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        client
            .save_singleton(Some(&who), SingletonKind::PracticalInfo, values)
            .await
            .unwrap();
        let mut second = client
            .load_singleton(Some(&who), SingletonKind::PracticalInfo)
            .await
            .unwrap()
            .unwrap();

        let first_stamp = first.remove(LAST_UPDATED_FIELD).unwrap();
        let second_stamp = second.remove(LAST_UPDATED_FIELD).unwrap();
        assert_ne!(first_stamp, second_stamp);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_lenient_without_identity_is_a_no_op() {
        let client = client(AccessMode::Lenient);

        assert_eq!(
            client
                .save_singleton(None, SingletonKind::WishList, Fields::new())
                .await
                .unwrap(),
            None
        );
        assert_eq!(client.load_singleton(None, SingletonKind::WishList).await.unwrap(), None);
        assert_eq!(
            client
                .upsert_item(None, CollectionKind::PrivateSubscriptions, Fields::new())
                .await
                .unwrap(),
            None
        );
        assert!(client
            .list_items(None, CollectionKind::PrivateSubscriptions)
            .await
            .unwrap()
            .is_empty());
        client
            .delete_item(None, CollectionKind::PrivateSubscriptions, "1")
            .await
            .unwrap();
        assert_eq!(client.status(), OperationStatus::default());
    }

    #[tokio::test]
    async fn test_strict_without_identity_fails() {
        let client = client(AccessMode::Strict);
        let err = client
            .load_singleton(None, SingletonKind::WishList)
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Unauthenticated);
        assert_eq!(client.status().last_error, Some(err.to_string()));
    }

    #[tokio::test]
    async fn test_upsert_returns_store_assigned_id() {
        let client = client(AccessMode::Lenient);
        let who = anna();

        let outcome = client
            .upsert_item(Some(&who), CollectionKind::BusinessSubscriptions, fields(json!({"naam": "Exact"})))
            .await
            .unwrap()
            .unwrap();
        let UpsertOutcome::Created(id) = outcome else {
            panic!("expected a created item");
        };

        let items = client
            .list_items(Some(&who), CollectionKind::BusinessSubscriptions)
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0][ID_FIELD], Value::String(id));
        assert_eq!(items[0]["naam"], "Exact");
    }

    #[tokio::test]
    async fn test_non_string_id_is_rejected() {
        let client = client(AccessMode::Lenient);
        let err = client
            .upsert_item(
                Some(&anna()),
                CollectionKind::PrivateSubscriptions,
                fields(json!({"id": 7, "naam": "Spotify"})),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord(_)));
    }
}
