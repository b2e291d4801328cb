//! Error types for the mail client

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    /// Nothing to send; checked before any request
    #[error("Input is empty")]
    EmptyInput,

    #[error("Unknown tone: {0}")]
    UnknownTone(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, MailError>;
