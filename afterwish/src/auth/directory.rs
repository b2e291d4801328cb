//! Account storage behind the local identity provider

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::db::schemas::UserDoc;
use crate::types::StoreError;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up an account by normalized email
    async fn find_by_email(&self, email: &str) -> Result<Option<UserDoc>, StoreError>;

    /// Store a new account; [`StoreError::Conflict`] when the email is taken
    async fn insert(&self, user: UserDoc) -> Result<(), StoreError>;

    /// Overwrite an existing account, matched by uid
    async fn update(&self, user: &UserDoc) -> Result<(), StoreError>;
}

/// Directory kept in process memory, keyed by email
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    users: RwLock<HashMap<String, UserDoc>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserDoc>, StoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn insert(&self, user: UserDoc) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.identifier) {
            return Err(StoreError::Conflict(format!(
                "account '{}' already exists",
                user.identifier
            )));
        }
        users.insert(user.identifier.clone(), user);
        Ok(())
    }

    async fn update(&self, user: &UserDoc) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        match users.values_mut().find(|existing| existing.uid == user.uid) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(StoreError::InvalidRecord(format!("unknown uid '{}'", user.uid))),
        }
    }
}
