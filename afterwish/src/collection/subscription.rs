//! Subscription items

use std::fmt;

use serde_json::Value;

use super::category::CategoryTag;
use super::error::EditorError;
use crate::db::Fields;
use crate::records::ID_FIELD;

/// One recorded subscription
#[derive(Clone, PartialEq, Eq)]
pub struct Subscription<C> {
    pub id: String,
    pub categorie: C,
    pub naam: String,
    pub provider: String,
    pub klantnummer: Option<String>,
    pub telefoon: Option<String>,
    pub email: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub notities: Option<String>,
    pub completed: bool,
}

// password stays out of logs
impl<C: fmt::Debug> fmt::Debug for Subscription<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("categorie", &self.categorie)
            .field("naam", &self.naam)
            .field("provider", &self.provider)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("completed", &self.completed)
            .finish_non_exhaustive()
    }
}

/// A subscription not yet added
#[derive(Clone, PartialEq, Eq)]
pub struct SubscriptionDraft<C> {
    pub categorie: C,
    pub naam: String,
    pub provider: String,
    pub klantnummer: Option<String>,
    pub telefoon: Option<String>,
    pub email: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub notities: Option<String>,
}

impl<C: fmt::Debug> fmt::Debug for SubscriptionDraft<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionDraft")
            .field("categorie", &self.categorie)
            .field("naam", &self.naam)
            .field("provider", &self.provider)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish_non_exhaustive()
    }
}

impl<C: CategoryTag> SubscriptionDraft<C> {
    pub fn new(categorie: C, naam: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            categorie,
            naam: naam.into(),
            provider: provider.into(),
            klantnummer: None,
            telefoon: None,
            email: None,
            login: None,
            password: None,
            notities: None,
        }
    }

    /// `naam` and `provider` must be filled in before a draft can be added
    pub fn check(&self) -> Result<(), EditorError> {
        if self.naam.trim().is_empty() {
            return Err(EditorError::MissingField("naam"));
        }
        if self.provider.trim().is_empty() {
            return Err(EditorError::MissingField("provider"));
        }
        Ok(())
    }

    pub fn into_subscription(self, id: String) -> Subscription<C> {
        Subscription {
            id,
            categorie: self.categorie,
            naam: self.naam,
            provider: self.provider,
            klantnummer: non_empty(self.klantnummer),
            telefoon: non_empty(self.telefoon),
            email: non_empty(self.email),
            login: non_empty(self.login),
            password: non_empty(self.password),
            notities: non_empty(self.notities),
            completed: false,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn optional_text(fields: &Fields, name: &str) -> Result<Option<String>, EditorError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(EditorError::InvalidItem(format!(
            "{} must be text, got {}",
            name, other
        ))),
    }
}

fn required_text(fields: &Fields, name: &'static str) -> Result<String, EditorError> {
    optional_text(fields, name)?
        .ok_or_else(|| EditorError::InvalidItem(format!("{} is missing", name)))
}

impl<C: CategoryTag> Subscription<C> {
    /// Stored form, including the `id` field
    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(ID_FIELD.into(), Value::String(self.id.clone()));
        fields.insert("categorie".into(), Value::String(self.categorie.as_str().into()));
        fields.insert("naam".into(), Value::String(self.naam.clone()));
        fields.insert("provider".into(), Value::String(self.provider.clone()));
        for (name, value) in [
            ("klantnummer", &self.klantnummer),
            ("telefoon", &self.telefoon),
            ("email", &self.email),
            ("login", &self.login),
            ("password", &self.password),
            ("notities", &self.notities),
        ] {
            if let Some(value) = value {
                fields.insert(name.into(), Value::String(value.clone()));
            }
        }
        fields.insert("completed".into(), Value::Bool(self.completed));
        fields
    }

    pub fn from_fields(fields: &Fields) -> Result<Self, EditorError> {
        let id = required_text(fields, ID_FIELD)?;
        let tag = required_text(fields, "categorie")?;
        let categorie = C::parse(&tag)
            .ok_or_else(|| EditorError::InvalidItem(format!("unknown category '{}'", tag)))?;

        Ok(Self {
            id,
            categorie,
            naam: required_text(fields, "naam")?,
            provider: required_text(fields, "provider")?,
            klantnummer: optional_text(fields, "klantnummer")?,
            telefoon: optional_text(fields, "telefoon")?,
            email: optional_text(fields, "email")?,
            login: optional_text(fields, "login")?,
            password: optional_text(fields, "password")?,
            notities: optional_text(fields, "notities")?,
            completed: fields.get("completed").and_then(Value::as_bool).unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::PrivateCategory;
    use serde_json::json;

    #[test]
    fn test_draft_requires_name_and_provider() {
        let draft = SubscriptionDraft::new(PrivateCategory::Communicatie, "Netflix", " ");
        assert!(matches!(draft.check(), Err(EditorError::MissingField("provider"))));

        let draft = SubscriptionDraft::new(PrivateCategory::Communicatie, "", "Netflix BV");
        assert!(matches!(draft.check(), Err(EditorError::MissingField("naam"))));
    }

    #[test]
    fn test_stored_fields_parse_back() {
        let mut draft = SubscriptionDraft::new(PrivateCategory::Communicatie, "Netflix", "Netflix BV");
        draft.klantnummer = Some("NL-123".into());
        draft.notities = Some(String::new());
        let subscription = draft.into_subscription("1714557600000".into());
        assert_eq!(subscription.notities, None);

        let fields = subscription.to_fields();
        assert_eq!(fields["categorie"], "communicatie");
        assert!(!fields.contains_key("notities"));

        let parsed = Subscription::<PrivateCategory>::from_fields(&fields).unwrap();
        assert_eq!(parsed, subscription);
    }

    #[test]
    fn test_foreign_category_is_rejected() {
        let fields = json!({
            "id": "1", "categorie": "software", "naam": "Office 365", "provider": "Microsoft", "completed": false
        })
        .as_object()
        .cloned()
        .unwrap();
        assert!(Subscription::<PrivateCategory>::from_fields(&fields).is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let mut draft = SubscriptionDraft::new(PrivateCategory::Financieel, "Bankrekening", "ING");
        draft.password = Some("hunter2".into());
        let rendered = format!("{:?}", draft.into_subscription("1".into()));
        assert!(!rendered.contains("hunter2"));
    }
}
