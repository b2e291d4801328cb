//! Field rules and conditional requirements

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::db::Fields;

pub const REQUIRED_MESSAGE: &str = "Verplicht veld";
pub const CHOICE_MESSAGE: &str = "Ongeldige keuze";
pub const TYPE_MESSAGE: &str = "Ongeldige waarde";

static BSN: OnceLock<Regex> = OnceLock::new();
static POSTAL_CODE: OnceLock<Regex> = OnceLock::new();
static EMAIL: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("shape patterns are valid literals"))
}

/// Fixed text shapes a field can be held to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Dutch citizen service number: nine digits
    Bsn,
    /// Dutch postal code: four digits, two uppercase letters
    PostalCode,
    Email,
}

impl Shape {
    fn pattern(self) -> &'static Regex {
        match self {
            Self::Bsn => compiled(&BSN, r"^\d{9}$"),
            Self::PostalCode => compiled(&POSTAL_CODE, r"^\d{4}[A-Z]{2}$"),
            Self::Email => compiled(&EMAIL, r"^[^\s@]+@[^\s@]+\.[^\s@]+$"),
        }
    }

    pub fn matches(self, value: &str) -> bool {
        self.pattern().is_match(value)
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Bsn => "BSN moet 9 cijfers bevatten",
            Self::PostalCode => "Postcode moet format 1234AB hebben",
            Self::Email => "Ongeldig emailadres",
        }
    }
}

pub fn is_email(value: &str) -> bool {
    Shape::Email.matches(value)
}

/// A check applied to a non-empty text value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    OneOf(&'static [&'static str]),
    Shape(Shape),
}

impl Rule {
    pub fn check(&self, value: &str) -> Option<&'static str> {
        match self {
            Self::OneOf(options) if !options.contains(&value) => Some(CHOICE_MESSAGE),
            Self::Shape(shape) if !shape.matches(value) => Some(shape.message()),
            _ => None,
        }
    }
}

/// A predicate over one sibling field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    IsTrue(&'static str),
    Equals(&'static str, &'static str),
}

impl Condition {
    /// The field whose value decides the condition
    pub fn controller(&self) -> &'static str {
        match self {
            Self::IsTrue(field) | Self::Equals(field, _) => *field,
        }
    }

    pub fn holds(&self, values: &Fields) -> bool {
        match self {
            Self::IsTrue(field) => values.get(*field) == Some(&Value::Bool(true)),
            Self::Equals(field, expected) => {
                values.get(*field).and_then(Value::as_str) == Some(*expected)
            }
        }
    }
}

/// `field` is required while `when` holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub field: &'static str,
    pub when: Condition,
}

impl Requirement {
    pub fn new(field: &'static str, when: Condition) -> Self {
        Self { field, when }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bsn_shape() {
        assert!(Shape::Bsn.matches("123456782"));
        assert!(!Shape::Bsn.matches("12345678"));
        assert!(!Shape::Bsn.matches("1234567890"));
        assert!(!Shape::Bsn.matches("12345678a"));
    }

    #[test]
    fn test_postal_code_shape() {
        assert!(Shape::PostalCode.matches("1234AB"));
        assert!(!Shape::PostalCode.matches("1234ab"));
        assert!(!Shape::PostalCode.matches("1234 AB"));
        assert!(!Shape::PostalCode.matches("123AB"));
    }

    #[test]
    fn test_email_shape() {
        assert!(is_email("anna@example.nl"));
        assert!(!is_email("anna@example"));
        assert!(!is_email("anna example.nl"));
    }

    #[test]
    fn test_one_of() {
        let rule = Rule::OneOf(&["begraven", "cremeren"]);
        assert_eq!(rule.check("cremeren"), None);
        assert_eq!(rule.check("verstrooien"), Some(CHOICE_MESSAGE));
    }

    #[test]
    fn test_conditions() {
        let values = json!({"testament": true, "soortUitvaart": "cremeren"})
            .as_object()
            .cloned()
            .unwrap();
        assert!(Condition::IsTrue("testament").holds(&values));
        assert!(!Condition::IsTrue("uitvaartverzekering").holds(&values));
        assert!(!Condition::Equals("soortUitvaart", "begraven").holds(&values));
        assert_eq!(Condition::Equals("soortUitvaart", "begraven").controller(), "soortUitvaart");
    }
}
