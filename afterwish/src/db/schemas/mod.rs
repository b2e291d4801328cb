//! MongoDB document structures for users and records

mod metadata;
mod record;
mod user;

pub use metadata::Metadata;
pub use record::{ItemDoc, SingletonDoc, ITEM_COLLECTION, SINGLETON_COLLECTION};
pub use user::{UserDoc, USER_COLLECTION};
