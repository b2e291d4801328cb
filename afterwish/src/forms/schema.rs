//! Declarative form schemas

use std::collections::BTreeSet;

use serde_json::Value;

use super::error::{ValidationError, ValidationErrors};
use super::rules::{Condition, Requirement, Rule, REQUIRED_MESSAGE, TYPE_MESSAGE};
use crate::db::Fields;
use crate::records::SingletonKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Flag,
}

impl FieldKind {
    pub fn expected(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Flag => "true or false",
        }
    }

    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (_, Value::Null) | (Self::Text, Value::String(_)) | (Self::Flag, Value::Bool(_))
        )
    }
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub section: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Value,
    pub rules: Vec<Rule>,
    pub visible_when: Option<Condition>,
}

impl FieldSpec {
    pub fn text(name: &'static str, section: &'static str) -> Self {
        Self {
            name,
            section,
            kind: FieldKind::Text,
            required: false,
            default: Value::String(String::new()),
            rules: Vec::new(),
            visible_when: None,
        }
    }

    /// A boolean field, defaulting to false
    pub fn flag(name: &'static str, section: &'static str) -> Self {
        Self {
            kind: FieldKind::Flag,
            default: Value::Bool(false),
            ..Self::text(name, section)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_text(mut self, value: &str) -> Self {
        self.default = Value::String(value.to_string());
        self
    }

    pub fn no_default(mut self) -> Self {
        self.default = Value::Null;
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn shown_when(mut self, condition: Condition) -> Self {
        self.visible_when = Some(condition);
        self
    }

    /// First failing rule for `value`, if any
    fn check(&self, value: Option<&Value>, required: bool) -> Option<&'static str> {
        let empty = match value {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        };
        if empty {
            return required.then_some(REQUIRED_MESSAGE);
        }

        match (self.kind, value) {
            (FieldKind::Text, Some(Value::String(s))) => {
                self.rules.iter().find_map(|rule| rule.check(s))
            }
            (FieldKind::Flag, Some(Value::Bool(_))) => None,
            _ => Some(TYPE_MESSAGE),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormSchema {
    kind: SingletonKind,
    fields: Vec<FieldSpec>,
    requirements: Vec<Requirement>,
}

impl FormSchema {
    pub fn new(kind: SingletonKind, fields: Vec<FieldSpec>, requirements: Vec<Requirement>) -> Self {
        Self {
            kind,
            fields,
            requirements,
        }
    }

    pub fn kind(&self) -> SingletonKind {
        self.kind
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn defaults(&self) -> Fields {
        self.fields
            .iter()
            .map(|f| (f.name.to_string(), f.default.clone()))
            .collect()
    }

    /// Whether changing `name` can change another field's requiredness
    pub fn is_controller(&self, name: &str) -> bool {
        self.requirements.iter().any(|r| r.when.controller() == name)
    }

    pub fn dependents_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'static str> + 'a {
        self.requirements
            .iter()
            .filter(move |r| r.when.controller() == name)
            .map(|r| r.field)
    }

    /// Fields whose conditional requirement currently holds
    pub fn active_requirements(&self, values: &Fields) -> BTreeSet<&'static str> {
        self.requirements
            .iter()
            .filter(|r| r.when.holds(values))
            .map(|r| r.field)
            .collect()
    }

    pub fn is_required(&self, name: &str, values: &Fields) -> bool {
        self.field(name).is_some_and(|f| f.required)
            || self
                .requirements
                .iter()
                .any(|r| r.field == name && r.when.holds(values))
    }

    pub fn is_visible(&self, name: &str, values: &Fields) -> bool {
        self.field(name)
            .is_some_and(|f| f.visible_when.as_ref().map_or(true, |c| c.holds(values)))
    }

    pub fn validate_field(&self, name: &str, values: &Fields) -> Option<ValidationError> {
        let spec = self.field(name)?;
        spec.check(values.get(name), self.is_required(name, values))
            .map(|message| ValidationError {
                field: spec.name,
                section: spec.section,
                message: message.to_string(),
            })
    }

    pub fn validate(&self, values: &Fields) -> Result<(), ValidationErrors> {
        let errors: Vec<ValidationError> = self
            .fields
            .iter()
            .filter_map(|spec| self.validate_field(spec.name, values))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors::new(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::rules::{Shape, CHOICE_MESSAGE};
    use serde_json::json;

    fn schema() -> FormSchema {
        FormSchema::new(
            SingletonKind::PracticalInfo,
            vec![
                FieldSpec::text("bsn", "persoon").required().rule(Rule::Shape(Shape::Bsn)),
                FieldSpec::text("kleur", "persoon").rule(Rule::OneOf(&["rood", "blauw"])),
                FieldSpec::flag("testament", "testament"),
                FieldSpec::text("notaris", "testament").shown_when(Condition::IsTrue("testament")),
            ],
            vec![Requirement::new("notaris", Condition::IsTrue("testament"))],
        )
    }

    fn values(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_defaults() {
        let defaults = schema().defaults();
        assert_eq!(defaults["bsn"], "");
        assert_eq!(defaults["testament"], false);
    }

    #[test]
    fn test_optional_empty_fields_skip_rules() {
        let schema = schema();
        let v = values(json!({"bsn": "123456789", "kleur": "", "testament": false}));
        assert!(schema.validate(&v).is_ok());
    }

    #[test]
    fn test_rules_apply_once_filled() {
        let schema = schema();
        let v = values(json!({"bsn": "12", "kleur": "groen", "testament": false}));
        let errors = schema.validate(&v).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.for_field("bsn").unwrap().message, Shape::Bsn.message());
        assert_eq!(errors.for_field("kleur").unwrap().message, CHOICE_MESSAGE);
    }

    #[test]
    fn test_conditional_requirement() {
        let schema = schema();
        let mut v = values(json!({"bsn": "123456789", "testament": true, "notaris": ""}));
        assert!(schema.is_required("notaris", &v));
        assert!(schema.is_visible("notaris", &v));
        assert_eq!(
            schema.validate(&v).unwrap_err().for_field("notaris").unwrap().message,
            REQUIRED_MESSAGE
        );

        v.insert("testament".into(), json!(false));
        assert!(!schema.is_required("notaris", &v));
        assert!(!schema.is_visible("notaris", &v));
        assert!(schema.validate(&v).is_ok());
    }

    #[test]
    fn test_wrong_type_is_reported() {
        let schema = schema();
        let v = values(json!({"bsn": "123456789", "testament": "ja"}));
        assert_eq!(
            schema.validate(&v).unwrap_err().for_field("testament").unwrap().message,
            TYPE_MESSAGE
        );
    }

    #[test]
    fn test_controllers_and_dependents() {
        let schema = schema();
        assert!(schema.is_controller("testament"));
        assert!(!schema.is_controller("bsn"));
        assert_eq!(schema.dependents_of("testament").collect::<Vec<_>>(), vec!["notaris"]);
    }
}
