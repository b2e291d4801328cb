//! Email drafting for Afterwish
//!
//! Turns rough notes into a Dutch email in a chosen tone, polishes an
//! existing email, or makes it more assertive. Each action is one request to
//! a Messages-style language model API; nothing is retried or cached.
//!
//! # Example
//!
//! ```rust,no_run
//! use afterwish_mail::{MailClient, MailConfig, PromptVariant, Tone};
//!
//! # async fn example() -> Result<(), afterwish_mail::MailError> {
//! let client = MailClient::new(MailConfig {
//!     api_key: Some("sk-...".into()),
//!     ..Default::default()
//! })?;
//!
//! let email = client
//!     .run(&PromptVariant::Draft {
//!         notes: "factuur klopt niet, graag correctie voor vrijdag".into(),
//!         replying_to: None,
//!         tone: Tone::Zakelijk,
//!     })
//!     .await?;
//! println!("{}", email);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod prompt;
pub mod tone;

pub use client::{MailClient, MailConfig};
pub use error::{MailError, Result};
pub use prompt::PromptVariant;
pub use tone::Tone;
