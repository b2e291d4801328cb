//! Identity and session handling
//!
//! Provides:
//! - The [`Identity`] principal every record belongs to
//! - An [`IdentityProvider`] seam with a local email/password implementation
//! - Password hashing with Argon2
//! - A [`SessionProvider`] that publishes the signed-in identity

pub mod directory;
pub mod identity;
pub mod notifier;
pub mod password;
pub mod provider;
pub mod session;

pub use directory::{MemoryUserDirectory, UserDirectory};
pub use identity::{normalize_email, Identity};
pub use notifier::{LogNotifier, MemoryNotifier, Notice, Notifier};
pub use password::{check_password, hash_new_password, MIN_PASSWORD_LEN};
pub use provider::{IdentityProvider, LocalIdentityProvider};
pub use session::SessionProvider;
