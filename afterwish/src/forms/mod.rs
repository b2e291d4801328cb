//! Form binding layer
//!
//! Schemas declare fields, their rules and conditional requirements; a
//! [`FormBinding`] holds the editable values and syncs them with the store.

pub mod binding;
pub mod error;
pub mod practical_info;
pub mod rules;
pub mod schema;
pub mod wish_list;

pub use binding::{FormBinding, FormPhase};
pub use error::{FormError, ValidationError, ValidationErrors};
pub use practical_info::{practical_info_schema, PracticalInfo, PROVINCES};
pub use rules::{is_email, Condition, Requirement, Rule, Shape, CHOICE_MESSAGE, REQUIRED_MESSAGE};
pub use schema::{FieldKind, FieldSpec, FormSchema};
pub use wish_list::{wish_list_schema, WishList};
