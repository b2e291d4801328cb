//! Shared types for Afterwish

pub mod error;

pub use error::{AfterwishError, AuthError, Result, StoreError};
