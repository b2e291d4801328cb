//! Collection editor errors

use crate::types::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("{0} is verplicht")]
    MissingField(&'static str),

    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("Invalid item: {0}")]
    InvalidItem(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
