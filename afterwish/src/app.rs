//! Application context
//!
//! Holds the store, the session and the access mode, and hands out forms and
//! editors bound to whoever is signed in at the time they are created.

use std::sync::Arc;

use crate::auth::{LocalIdentityProvider, LogNotifier, MemoryUserDirectory, SessionProvider};
use crate::collection::{Business, CollectionEditor, Private};
use crate::db::{DocumentStore, MemoryStore};
use crate::forms::{practical_info_schema, wish_list_schema, FormBinding};
use crate::records::{AccessMode, RecordClient};

pub struct AppContext {
    store: Arc<dyn DocumentStore>,
    session: SessionProvider,
    mode: AccessMode,
}

impl AppContext {
    pub fn new(store: Arc<dyn DocumentStore>, session: SessionProvider, mode: AccessMode) -> Self {
        Self {
            store,
            session,
            mode,
        }
    }

    /// Everything in process memory; accounts and records vanish on exit
    pub fn in_memory(mode: AccessMode) -> Self {
        let provider = LocalIdentityProvider::new(
            Arc::new(MemoryUserDirectory::new()),
            Arc::new(LogNotifier::default()),
        );
        Self::new(
            Arc::new(MemoryStore::new()),
            SessionProvider::new(Arc::new(provider)),
            mode,
        )
    }

    pub fn session(&self) -> &SessionProvider {
        &self.session
    }

    /// A fresh client with its own status
    pub fn client(&self) -> RecordClient {
        RecordClient::new(self.store.clone(), self.mode)
    }

    pub fn practical_info_form(&self) -> FormBinding {
        FormBinding::new(practical_info_schema(), self.client(), self.session.current())
    }

    pub fn wish_list_form(&self) -> FormBinding {
        FormBinding::new(wish_list_schema(), self.client(), self.session.current())
    }

    pub fn business_subscriptions(&self) -> CollectionEditor<Business> {
        CollectionEditor::new(self.client(), self.session.current())
    }

    pub fn private_subscriptions(&self) -> CollectionEditor<Private> {
        CollectionEditor::new(self.client(), self.session.current())
    }
}
