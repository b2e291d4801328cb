//! Collection editor
//!
//! Keeps the identity's items of one kind in memory. Every add, toggle and
//! remove is mirrored to the store, and each entry remembers whether the
//! store confirmed it.

use std::marker::PhantomData;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::category::{CategoryTag, ItemKind};
use super::error::EditorError;
use super::subscription::{Subscription, SubscriptionDraft};
use crate::auth::Identity;
use crate::records::RecordClient;
use crate::status::OperationStatus;
use crate::types::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    /// Not confirmed by the store (e.g. no identity yet)
    Pending,
    Confirmed,
    Failed(String),
}

/// What happens to a local change the store rejected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RollbackPolicy {
    /// Keep the change and mark the entry failed
    #[default]
    Keep,
    /// Undo the change
    Revert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<C> {
    pub item: Subscription<C>,
    pub sync: SyncState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryProgress<C> {
    pub category: C,
    pub completed: usize,
    pub total: usize,
}

/// Millisecond-clock ids, strictly increasing within one editor
#[derive(Debug, Default)]
struct IdClock {
    last: i64,
}

impl IdClock {
    fn next(&mut self, taken: impl Fn(&str) -> bool) -> String {
        let mut candidate = Utc::now().timestamp_millis().max(self.last + 1);
        while taken(&candidate.to_string()) {
            candidate += 1;
        }
        self.last = candidate;
        candidate.to_string()
    }
}

pub struct CollectionEditor<K: ItemKind> {
    client: RecordClient,
    identity: Option<Identity>,
    entries: Vec<Entry<K::Category>>,
    policy: RollbackPolicy,
    clock: IdClock,
    last_error: Option<String>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ItemKind> CollectionEditor<K> {
    pub fn new(client: RecordClient, identity: Option<Identity>) -> Self {
        Self {
            client,
            identity,
            entries: Vec::new(),
            policy: RollbackPolicy::default(),
            clock: IdClock::default(),
            last_error: None,
            _kind: PhantomData,
        }
    }

    pub fn with_policy(mut self, policy: RollbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn fail(&mut self, err: &StoreError) -> SyncState {
        let message = err.user_message().to_string();
        self.last_error = Some(message.clone());
        SyncState::Failed(message)
    }

    fn position(&self, id: &str) -> Result<usize, EditorError> {
        self.entries
            .iter()
            .position(|e| e.item.id == id)
            .ok_or_else(|| EditorError::UnknownItem(id.to_string()))
    }

    /// Replace the local list with what the store holds.
    ///
    /// Stored items that do not parse (for example a category outside this
    /// kind's set) are logged and left out.
    pub async fn mount(&mut self) -> Result<(), EditorError> {
        let records = match self
            .client
            .list_items(self.identity.as_ref(), K::COLLECTION)
            .await
        {
            Ok(records) => records,
            Err(e) => {
                self.fail(&e);
                return Err(e.into());
            }
        };

        self.entries = records
            .iter()
            .filter_map(|fields| match Subscription::from_fields(fields) {
                Ok(item) => Some(Entry {
                    item,
                    sync: SyncState::Confirmed,
                }),
                Err(e) => {
                    warn!(collection = K::COLLECTION.as_str(), error = %e, "Skipping stored item");
                    None
                }
            })
            .collect();
        self.last_error = None;

        debug!(collection = K::COLLECTION.as_str(), count = self.entries.len(), "Collection loaded");
        Ok(())
    }

    /// Add a new, incomplete item and return its id.
    ///
    /// Drafts without `naam` or `provider` are rejected before any store call.
    pub async fn add(&mut self, draft: SubscriptionDraft<K::Category>) -> Result<String, EditorError> {
        draft.check()?;

        let entries = &self.entries;
        let id = self.clock.next(|candidate| entries.iter().any(|e| e.item.id == candidate));
        let item = draft.into_subscription(id.clone());

        let result = self
            .client
            .upsert_item(self.identity.as_ref(), K::COLLECTION, item.to_fields())
            .await;

        let sync = match result {
            Ok(Some(_)) => SyncState::Confirmed,
            Ok(None) => SyncState::Pending,
            Err(e) => {
                let failed = self.fail(&e);
                if self.policy == RollbackPolicy::Keep {
                    self.entries.push(Entry { item, sync: failed });
                }
                return Err(e.into());
            }
        };

        info!(collection = K::COLLECTION.as_str(), id = %id, "Item added");
        self.last_error = None;
        self.entries.push(Entry { item, sync });
        Ok(id)
    }

    /// Flip an item's completed flag and store the whole item; returns the new flag
    pub async fn toggle_complete(&mut self, id: &str) -> Result<bool, EditorError> {
        let index = self.position(id)?;
        let previous = self.entries[index].clone();

        let mut item = previous.item.clone();
        item.completed = !item.completed;
        let completed = item.completed;

        let result = self
            .client
            .upsert_item(self.identity.as_ref(), K::COLLECTION, item.to_fields())
            .await;

        let sync = match result {
            Ok(Some(_)) => SyncState::Confirmed,
            Ok(None) => SyncState::Pending,
            Err(e) => {
                let failed = self.fail(&e);
                self.entries[index] = match self.policy {
                    RollbackPolicy::Keep => Entry { item, sync: failed },
                    RollbackPolicy::Revert => previous,
                };
                return Err(e.into());
            }
        };

        self.last_error = None;
        self.entries[index] = Entry { item, sync };
        Ok(completed)
    }

    /// Delete an item from the store and the local list
    pub async fn remove(&mut self, id: &str) -> Result<(), EditorError> {
        let index = self.position(id)?;

        let result = self
            .client
            .delete_item(self.identity.as_ref(), K::COLLECTION, id)
            .await;

        match result {
            Ok(()) => {
                self.last_error = None;
                self.entries.remove(index);
                info!(collection = K::COLLECTION.as_str(), id, "Item removed");
                Ok(())
            }
            Err(e) => {
                let failed = self.fail(&e);
                match self.policy {
                    RollbackPolicy::Keep => {
                        self.entries.remove(index);
                    }
                    RollbackPolicy::Revert => self.entries[index].sync = failed,
                }
                Err(e.into())
            }
        }
    }

    pub fn entries(&self) -> &[Entry<K::Category>] {
        &self.entries
    }

    pub fn items(&self) -> impl Iterator<Item = &Subscription<K::Category>> {
        self.entries.iter().map(|e| &e.item)
    }

    pub fn get(&self, id: &str) -> Option<&Entry<K::Category>> {
        self.entries.iter().find(|e| e.item.id == id)
    }

    pub fn filter_by_category(&self, category: K::Category) -> Vec<&Subscription<K::Category>> {
        self.items().filter(|i| i.categorie == category).collect()
    }

    /// Completed and total counts for every category of the kind
    pub fn progress(&self) -> Vec<CategoryProgress<K::Category>> {
        K::Category::ALL
            .iter()
            .map(|&category| {
                let items = self.filter_by_category(category);
                CategoryProgress {
                    category,
                    completed: items.iter().filter(|i| i.completed).count(),
                    total: items.len(),
                }
            })
            .collect()
    }

    pub fn suggestions(&self, category: K::Category) -> &'static [&'static str] {
        category.suggestions()
    }

    /// A draft named after a suggestion; the provider still has to be filled in
    pub fn draft_from_suggestion(
        &self,
        category: K::Category,
        name: &str,
    ) -> SubscriptionDraft<K::Category> {
        SubscriptionDraft::new(category, name, "")
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn status(&self) -> OperationStatus {
        self.client.status()
    }
}
