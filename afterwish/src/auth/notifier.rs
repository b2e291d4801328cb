//! Out-of-band account messages (verification and password reset)

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

use crate::logging::LogFormat;
use crate::types::AuthError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    VerifyEmail { email: String, code: String },
    PasswordReset { email: String, code: String },
}

impl Notice {
    pub fn email(&self) -> &str {
        match self {
            Self::VerifyEmail { email, .. } | Self::PasswordReset { email, .. } => email,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::VerifyEmail { code, .. } | Self::PasswordReset { code, .. } => code,
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, notice: Notice) -> Result<(), AuthError>;
}

/// Writes notices to the log; the default outside of a mail integration.
///
/// Notices go out at `warn` so the codes show at the default log level.
#[derive(Debug, Default)]
pub struct LogNotifier {
    format: LogFormat,
    cautioned: AtomicBool,
}

impl LogNotifier {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            cautioned: AtomicBool::new(false),
        }
    }

    /// JSON logs tend to be shipped elsewhere; say once that codes end up in them
    fn caution_once(&self) {
        if self.format == LogFormat::Json && !self.cautioned.swap(true, Ordering::SeqCst) {
            warn!("Account codes are written to the JSON log; keep these logs private");
        }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn deliver(&self, notice: Notice) -> Result<(), AuthError> {
        self.caution_once();
        match &notice {
            Notice::VerifyEmail { email, code } => {
                warn!(email = %email, code = %code, "Email verification code issued")
            }
            Notice::PasswordReset { email, code } => {
                warn!(email = %email, code = %code, "Password reset code issued")
            }
        }
        Ok(())
    }
}

/// Keeps delivered notices so they can be inspected
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<Notice> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn deliver(&self, notice: Notice) -> Result<(), AuthError> {
        self.sent.lock().await.push(notice);
        Ok(())
    }
}
