//! Session state
//!
//! The session holds the signed-in identity (if any) and publishes every
//! change. Components never read a global; they are handed the identity they
//! act for.

use std::sync::Arc;

use futures::Stream;
use tokio::sync::watch;
use tracing::info;

use super::{Identity, IdentityProvider};
use crate::status::{OperationStatus, StatusTracker};
use crate::types::AuthError;

pub struct SessionProvider {
    provider: Arc<dyn IdentityProvider>,
    current: watch::Sender<Option<Identity>>,
    status: StatusTracker,
}

impl SessionProvider {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            provider,
            current,
            status: StatusTracker::new(),
        }
    }

    pub fn current(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    /// Identity states, starting with the current one.
    ///
    /// The stream ends only when the session is dropped. A slow consumer
    /// sees the latest state; intermediate states may be skipped.
    pub fn observe(&self) -> impl Stream<Item = Option<Identity>> + Send + 'static {
        let mut rx = self.current.subscribe();
        rx.mark_changed();
        futures::stream::unfold(rx, |mut rx| async move {
            rx.changed().await.ok()?;
            let state = rx.borrow_and_update().clone();
            Some((state, rx))
        })
    }

    pub fn status(&self) -> OperationStatus {
        self.status.current()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<OperationStatus> {
        self.status.subscribe()
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.status.begin();
        let result = self.provider.sign_in(email, password).await;
        self.status.finish(&result);

        let identity = result?;
        self.current.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.status.begin();
        let result = self.provider.sign_up(email, password).await;
        self.status.finish(&result);

        let identity = result?;
        self.current.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.status.begin();
        let result = match self.current() {
            Some(identity) => self.provider.sign_out(&identity).await,
            None => Ok(()),
        };
        self.status.finish(&result);
        result?;

        if let Some(previous) = self.current.send_replace(None) {
            info!(uid = %previous.uid, "Signed out");
        }
        Ok(())
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        self.status.begin();
        let result = self.provider.request_password_reset(email).await;
        self.status.finish(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{LocalIdentityProvider, MemoryNotifier, MemoryUserDirectory};
    use futures::StreamExt;

    fn session() -> SessionProvider {
        SessionProvider::new(Arc::new(LocalIdentityProvider::new(
            Arc::new(MemoryUserDirectory::new()),
            Arc::new(MemoryNotifier::new()),
        )))
    }

    #[tokio::test]
    async fn test_observe_starts_with_current_state() {
        let session = session();
        let mut states = Box::pin(session.observe());
        assert_eq!(states.next().await, Some(None));
    }

    #[tokio::test]
    async fn test_observe_follows_sign_up_and_sign_out() {
        let session = session();
        let mut states = Box::pin(session.observe());
        assert_eq!(states.next().await, Some(None));

        let identity = session.sign_up("anna@example.nl", "geheim123").await.unwrap();
        assert_eq!(states.next().await, Some(Some(identity)));

        session.sign_out().await.unwrap();
        assert_eq!(states.next().await, Some(None));
        assert!(session.current().is_none());
    }

    #[tokio::test]
    async fn test_observe_ends_when_session_dropped() {
        let session = session();
        let mut states = Box::pin(session.observe());
        assert_eq!(states.next().await, Some(None));

        drop(session);
        assert_eq!(states.next().await, None);
    }

    #[tokio::test]
    async fn test_failed_sign_in_records_error_and_keeps_state() {
        let session = session();
        let err = session.sign_in("anna@example.nl", "geheim123").await.unwrap_err();

        let status = session.status();
        assert!(!status.in_flight);
        assert_eq!(status.last_error, Some(err.to_string()));
        assert!(session.current().is_none());

        // the next attempt starts clean
        session.sign_up("anna@example.nl", "geheim123").await.unwrap();
        assert_eq!(session.status().last_error, None);
    }
}
