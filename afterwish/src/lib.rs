//! Afterwish - per-user record keeping for the people left behind
//!
//! Afterwish keeps three things per signed-in user in a document store:
//!
//! - **Practical information**: personal details, address, insurance, testament
//! - **Wish list**: funeral and ceremony wishes
//! - **Subscriptions**: business and private inventories, ticked off one by one
//!
//! ## Layers
//!
//! - [`auth`]: identity provider and session
//! - [`records`]: identity-scoped record client over a [`db::DocumentStore`]
//! - [`forms`]: schema-driven form binding with validation
//! - [`collection`]: add/toggle/remove editing of subscription lists

pub mod app;
pub mod auth;
pub mod collection;
pub mod config;
pub mod db;
pub mod forms;
pub mod logging;
pub mod records;
pub mod status;
pub mod types;

pub use app::AppContext;
pub use config::Args;
pub use types::{AfterwishError, Result};
