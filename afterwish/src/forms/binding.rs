//! Form binding: schema-backed editable values synced with the record store
//!
//! Lifecycle: `Idle → Loading → Populated → Submitting → Populated`.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::{FormError, ValidationError, ValidationErrors};
use super::schema::{FieldKind, FormSchema};
use crate::auth::Identity;
use crate::db::Fields;
use crate::records::RecordClient;
use crate::status::OperationStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Loading,
    Populated,
    Submitting,
}

pub struct FormBinding {
    schema: FormSchema,
    client: RecordClient,
    identity: Option<Identity>,
    phase: FormPhase,
    values: Fields,
    conditional: BTreeSet<&'static str>,
    errors: BTreeMap<&'static str, ValidationError>,
    submitted_once: bool,
    last_saved_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl FormBinding {
    pub fn new(schema: FormSchema, client: RecordClient, identity: Option<Identity>) -> Self {
        let values = schema.defaults();
        let conditional = schema.active_requirements(&values);
        Self {
            schema,
            client,
            identity,
            phase: FormPhase::Idle,
            values,
            conditional,
            errors: BTreeMap::new(),
            submitted_once: false,
            last_saved_at: None,
            last_error: None,
        }
    }

    /// Load stored values over the defaults.
    ///
    /// A failed load leaves the defaults in place and records the error.
    pub async fn mount(&mut self) {
        self.phase = FormPhase::Loading;
        let kind = self.schema.kind();

        match self.client.load_singleton(self.identity.as_ref(), kind).await {
            Ok(Some(stored)) => {
                let mut applied = 0;
                for (name, value) in stored {
                    let Some(spec) = self.schema.field(&name) else {
                        continue;
                    };
                    if !spec.kind.accepts(&value) {
                        warn!(kind = kind.as_str(), field = %name, "Stored value has the wrong type, keeping default");
                        continue;
                    }
                    self.values.insert(name, value);
                    applied += 1;
                }
                debug!(kind = kind.as_str(), applied, "Form populated from store");
                self.last_error = None;
            }
            Ok(None) => {
                debug!(kind = kind.as_str(), "No stored record, using defaults");
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(e.user_message().to_string()),
        }

        self.conditional = self.schema.active_requirements(&self.values);
        self.phase = FormPhase::Populated;
    }

    /// Change one field.
    ///
    /// Changing a controlling field re-evaluates which fields are required;
    /// after the first submit the changed field and its dependents are
    /// re-validated right away.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), FormError> {
        let spec = self
            .schema
            .field(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        if !spec.kind.accepts(&value) {
            return Err(FormError::InvalidValue {
                field: name.to_string(),
                expected: spec.kind.expected(),
            });
        }
        let field = spec.name;

        self.values.insert(field.to_string(), value);

        let mut touched = vec![field];
        if self.schema.is_controller(field) {
            self.conditional = self.schema.active_requirements(&self.values);
            touched.extend(self.schema.dependents_of(field));
        }
        if self.submitted_once {
            for name in touched {
                match self.schema.validate_field(name, &self.values) {
                    Some(error) => self.errors.insert(name, error),
                    None => self.errors.remove(name),
                };
            }
        }
        Ok(())
    }

    /// Set a field from user-typed text, parsing flags as booleans
    pub fn set_text(&mut self, name: &str, raw: &str) -> Result<(), FormError> {
        let spec = self
            .schema
            .field(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;

        let value = match spec.kind {
            FieldKind::Text => Value::String(raw.to_string()),
            FieldKind::Flag => match raw.trim().to_lowercase().as_str() {
                "true" | "ja" | "yes" | "1" => Value::Bool(true),
                "false" | "nee" | "no" | "0" => Value::Bool(false),
                "" => Value::Null,
                _ => {
                    return Err(FormError::InvalidValue {
                        field: name.to_string(),
                        expected: spec.kind.expected(),
                    })
                }
            },
        };
        self.set(name, value)
    }

    /// Validate and save.
    ///
    /// Invalid values block the save without a store call. Returns the save
    /// stamp, or `None` when the save was skipped for lack of identity.
    pub async fn submit(&mut self) -> Result<Option<DateTime<Utc>>, FormError> {
        self.submitted_once = true;

        if let Err(errors) = self.schema.validate(&self.values) {
            self.errors = errors.iter().map(|e| (e.field, e.clone())).collect();
            debug!(kind = self.schema.kind().as_str(), invalid = errors.len(), "Submit blocked by validation");
            return Err(FormError::Invalid(errors));
        }
        self.errors.clear();

        let payload: Fields = self
            .values
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        self.phase = FormPhase::Submitting;
        let result = self
            .client
            .save_singleton(self.identity.as_ref(), self.schema.kind(), payload)
            .await;
        self.phase = FormPhase::Populated;

        match result {
            Ok(Some(stamp)) => {
                info!(kind = self.schema.kind().as_str(), "Form saved");
                self.last_saved_at = Some(stamp);
                self.last_error = None;
                Ok(Some(stamp))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                self.last_error = Some(e.user_message().to_string());
                Err(FormError::Store(e))
            }
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn values(&self) -> &Fields {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.schema.field(name).is_some_and(|f| f.required) || self.conditional.contains(name)
    }

    pub fn is_visible(&self, name: &str) -> bool {
        self.schema.is_visible(name, &self.values)
    }

    /// Errors currently shown, in schema order
    pub fn errors(&self) -> ValidationErrors {
        ValidationErrors::new(
            self.schema
                .fields()
                .iter()
                .filter_map(|spec| self.errors.get(spec.name).cloned())
                .collect(),
        )
    }

    pub fn error(&self, name: &str) -> Option<&ValidationError> {
        self.errors.get(name)
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn status(&self) -> OperationStatus {
        self.client.status()
    }

    /// Current values as a typed record
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, FormError> {
        serde_json::from_value(Value::Object(self.values.clone()))
            .map_err(|e| FormError::Decode(e.to_string()))
    }
}
