//! Error types for Afterwish

use crate::collection::EditorError;
use crate::forms::FormError;

/// Failure reported by the identity provider.
///
/// The display text is the provider message and is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("auth/invalid-email: The email address is badly formatted.")]
    InvalidEmail,

    #[error("auth/invalid-credential: The email address or password is incorrect.")]
    InvalidCredential,

    #[error("auth/email-already-in-use: The email address is already in use by another account.")]
    EmailAlreadyInUse,

    #[error("auth/weak-password: Password should be at least {0} characters.")]
    WeakPassword(usize),

    #[error("auth/user-disabled: The user account has been disabled.")]
    UserDisabled,

    #[error("auth/invalid-action-code: The reset or verification code is invalid or expired.")]
    InvalidActionCode,

    #[error("auth/network-request-failed: {0}")]
    Transport(String),

    #[error("auth/internal-error: {0}")]
    Internal(String),
}

/// Failure reported by the record store or one of its backends
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Not signed in")]
    Unauthenticated,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl StoreError {
    /// Message shown inline next to the form or list that triggered the call.
    ///
    /// Store details stay in the log.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "Je bent niet ingelogd.",
            _ => "Er is iets misgegaan bij het opslaan. Probeer het later opnieuw.",
        }
    }
}

/// Main error type for Afterwish operations
#[derive(Debug, thiserror::Error)]
pub enum AfterwishError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<bson::ser::Error> for StoreError {
    fn from(err: bson::ser::Error) -> Self {
        Self::InvalidRecord(format!("BSON encoding failed: {}", err))
    }
}

impl From<serde_json::Error> for AfterwishError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON error: {}", err))
    }
}

/// Result type alias for Afterwish operations
pub type Result<T> = std::result::Result<T, AfterwishError>;
