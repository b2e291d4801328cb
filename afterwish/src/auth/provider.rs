//! Identity providers
//!
//! [`IdentityProvider`] is what the session talks to. The local provider keeps
//! accounts in a [`UserDirectory`] and sends verification and reset codes
//! through a [`Notifier`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{
    check_password, hash_new_password, normalize_email, Identity, Notice, Notifier, UserDirectory,
};
use crate::db::schemas::UserDoc;
use crate::forms::is_email;
use crate::types::{AuthError, StoreError};

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Create an account and return it signed in
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn sign_out(&self, _identity: &Identity) -> Result<(), AuthError> {
        Ok(())
    }

    /// Send a reset code. Unknown addresses succeed without sending anything.
    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError>;
}

pub struct LocalIdentityProvider {
    directory: Arc<dyn UserDirectory>,
    notifier: Arc<dyn Notifier>,
}

fn transport(err: StoreError) -> AuthError {
    AuthError::Transport(err.to_string())
}

fn new_code() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn check_email(email: &str) -> Result<String, AuthError> {
    let email = normalize_email(email);
    if is_email(&email) {
        Ok(email)
    } else {
        Err(AuthError::InvalidEmail)
    }
}

impl LocalIdentityProvider {
    pub fn new(directory: Arc<dyn UserDirectory>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            directory,
            notifier,
        }
    }

    async fn find(&self, email: &str) -> Result<Option<UserDoc>, AuthError> {
        self.directory.find_by_email(email).await.map_err(transport)
    }

    /// Mark the address as verified using the code from the verification notice
    pub async fn confirm_email(&self, email: &str, code: &str) -> Result<(), AuthError> {
        let email = check_email(email)?;
        let mut user = self.find(&email).await?.ok_or(AuthError::InvalidActionCode)?;
        if user.verification_token.as_deref() != Some(code) {
            return Err(AuthError::InvalidActionCode);
        }

        user.email_verified = true;
        user.verification_token = None;
        self.directory.update(&user).await.map_err(transport)?;
        info!(uid = %user.uid, "Email verified");
        Ok(())
    }

    /// Set a new password using the code from the reset notice
    pub async fn complete_password_reset(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let email = check_email(email)?;
        let mut user = self.find(&email).await?.ok_or(AuthError::InvalidActionCode)?;
        if user.reset_token.as_deref() != Some(code) {
            return Err(AuthError::InvalidActionCode);
        }

        user.password_hash = hash_new_password(new_password)?;
        user.reset_token = None;
        self.directory.update(&user).await.map_err(transport)?;
        info!(uid = %user.uid, "Password reset completed");
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email = check_email(email)?;
        let user = self.find(&email).await?.ok_or(AuthError::InvalidCredential)?;

        if !user.is_active {
            warn!(uid = %user.uid, "Sign-in attempt on disabled account");
            return Err(AuthError::UserDisabled);
        }
        check_password(password, &user.password_hash)?;

        info!(uid = %user.uid, "Signed in");
        Ok(user.to_identity())
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email = check_email(email)?;
        let password_hash = hash_new_password(password)?;

        let code = new_code();
        let mut user = UserDoc::new(email.clone(), password_hash);
        user.verification_token = Some(code.clone());
        let identity = user.to_identity();

        self.directory.insert(user).await.map_err(|e| match e {
            StoreError::Conflict(_) => AuthError::EmailAlreadyInUse,
            other => transport(other),
        })?;
        info!(uid = %identity.uid, "Account created");

        self.notifier
            .deliver(Notice::VerifyEmail { email, code })
            .await?;
        Ok(identity)
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let email = check_email(email)?;
        let Some(mut user) = self.find(&email).await? else {
            debug!("Password reset requested for unknown address");
            return Ok(());
        };

        let code = new_code();
        user.reset_token = Some(code.clone());
        self.directory.update(&user).await.map_err(transport)?;

        self.notifier
            .deliver(Notice::PasswordReset { email, code })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryNotifier, MemoryUserDirectory};

    fn provider() -> (LocalIdentityProvider, Arc<MemoryNotifier>) {
        let notifier = Arc::new(MemoryNotifier::new());
        let provider =
            LocalIdentityProvider::new(Arc::new(MemoryUserDirectory::new()), notifier.clone());
        (provider, notifier)
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let (provider, notifier) = provider();
        let created = provider.sign_up("Anna@Example.nl", "geheim123").await.unwrap();
        assert_eq!(created.email, "anna@example.nl");
        assert!(!created.mfa_enabled);

        let signed_in = provider.sign_in("anna@example.nl", "geheim123").await.unwrap();
        assert_eq!(signed_in.uid, created.uid);

        let sent = notifier.sent().await;
        assert!(matches!(sent.as_slice(), [Notice::VerifyEmail { .. }]));
    }

    #[tokio::test]
    async fn test_sign_up_rejections() {
        let (provider, _) = provider();
        assert_eq!(
            provider.sign_up("not-an-email", "geheim123").await,
            Err(AuthError::InvalidEmail)
        );
        assert_eq!(
            provider.sign_up("anna@example.nl", "12345").await,
            Err(AuthError::WeakPassword(6))
        );

        provider.sign_up("anna@example.nl", "geheim123").await.unwrap();
        assert_eq!(
            provider.sign_up("anna@example.nl", "anders123").await,
            Err(AuthError::EmailAlreadyInUse)
        );
    }

    #[tokio::test]
    async fn test_unknown_account_and_wrong_password_look_the_same() {
        let (provider, _) = provider();
        provider.sign_up("anna@example.nl", "geheim123").await.unwrap();

        let wrong_password = provider.sign_in("anna@example.nl", "fout").await.unwrap_err();
        let unknown = provider.sign_in("piet@example.nl", "geheim123").await.unwrap_err();
        assert_eq!(wrong_password, AuthError::InvalidCredential);
        assert_eq!(unknown, wrong_password);
    }

    #[tokio::test]
    async fn test_reset_for_unknown_address_succeeds_silently() {
        let (provider, notifier) = provider();
        provider.request_password_reset("niemand@example.nl").await.unwrap();
        assert!(notifier.sent().await.is_empty());

        assert_eq!(
            provider.request_password_reset("kapot").await,
            Err(AuthError::InvalidEmail)
        );
    }

    #[tokio::test]
    async fn test_reset_flow_replaces_password() {
        let (provider, notifier) = provider();
        provider.sign_up("anna@example.nl", "geheim123").await.unwrap();
        provider.request_password_reset("anna@example.nl").await.unwrap();

        let code = notifier
            .sent()
            .await
            .into_iter()
            .find(|n| matches!(n, Notice::PasswordReset { .. }))
            .map(|n| n.code().to_string())
            .unwrap();

        assert_eq!(
            provider
                .complete_password_reset("anna@example.nl", "verkeerd", "nieuw-wachtwoord")
                .await,
            Err(AuthError::InvalidActionCode)
        );
        provider
            .complete_password_reset("anna@example.nl", &code, "nieuw-wachtwoord")
            .await
            .unwrap();

        assert!(provider.sign_in("anna@example.nl", "geheim123").await.is_err());
        provider.sign_in("anna@example.nl", "nieuw-wachtwoord").await.unwrap();

        // codes are single use
        assert_eq!(
            provider
                .complete_password_reset("anna@example.nl", &code, "nog-een-keer")
                .await,
            Err(AuthError::InvalidActionCode)
        );
    }

    #[tokio::test]
    async fn test_confirm_email() {
        let (provider, notifier) = provider();
        provider.sign_up("anna@example.nl", "geheim123").await.unwrap();
        let code = notifier.sent().await[0].code().to_string();

        provider.confirm_email("anna@example.nl", &code).await.unwrap();
        assert_eq!(
            provider.confirm_email("anna@example.nl", &code).await,
            Err(AuthError::InvalidActionCode)
        );
    }
}
