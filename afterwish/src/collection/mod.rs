//! Subscription inventories
//!
//! Two kinds (business and private), each with a closed category set,
//! edited through a [`CollectionEditor`].

pub mod category;
pub mod editor;
pub mod error;
pub mod subscription;

pub use category::{Business, BusinessCategory, CategoryTag, ItemKind, Private, PrivateCategory};
pub use editor::{CategoryProgress, CollectionEditor, Entry, RollbackPolicy, SyncState};
pub use error::EditorError;
pub use subscription::{Subscription, SubscriptionDraft};
