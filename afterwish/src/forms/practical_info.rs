//! Practical information: personal details, address, insurance and testament

use serde::{Deserialize, Serialize};

use super::rules::{Condition, Requirement, Rule, Shape};
use super::schema::{FieldSpec, FormSchema};
use crate::records::SingletonKind;

pub const PROVINCES: &[&str] = &[
    "Noord-Holland",
    "Zuid-Holland",
    "Utrecht",
    "Gelderland",
    "Noord-Brabant",
    "Limburg",
    "Zeeland",
    "Overijssel",
    "Flevoland",
    "Drenthe",
    "Groningen",
    "Friesland",
];

pub const SECTION_PERSONAL: &str = "Persoonlijke gegevens";
pub const SECTION_ADDRESS: &str = "Adres";
pub const SECTION_CONTACT: &str = "Contact";
pub const SECTION_INSURANCE: &str = "Uitvaartverzekering";
pub const SECTION_TESTAMENT: &str = "Testament";
pub const SECTION_DONOR: &str = "Donorregistratie";
pub const SECTION_BELONGINGS: &str = "Bezittingen en documenten";

pub fn practical_info_schema() -> FormSchema {
    FormSchema::new(
        SingletonKind::PracticalInfo,
        vec![
            FieldSpec::text("volledigeNaam", SECTION_PERSONAL).required(),
            FieldSpec::text("bsn", SECTION_PERSONAL)
                .required()
                .rule(Rule::Shape(Shape::Bsn)),
            FieldSpec::text("geboortedatum", SECTION_PERSONAL).required(),
            FieldSpec::text("banknummer", SECTION_PERSONAL).required(),
            FieldSpec::text("straat", SECTION_ADDRESS).required(),
            FieldSpec::text("huisnummer", SECTION_ADDRESS).required(),
            FieldSpec::text("postcode", SECTION_ADDRESS)
                .required()
                .rule(Rule::Shape(Shape::PostalCode)),
            FieldSpec::text("woonplaats", SECTION_ADDRESS).required(),
            FieldSpec::text("provincie", SECTION_ADDRESS)
                .required()
                .rule(Rule::OneOf(PROVINCES)),
            FieldSpec::text("land", SECTION_ADDRESS)
                .required()
                .default_text("Nederland"),
            FieldSpec::text("telefoon", SECTION_CONTACT).required(),
            FieldSpec::text("email", SECTION_CONTACT)
                .required()
                .rule(Rule::Shape(Shape::Email)),
            FieldSpec::flag("uitvaartverzekering", SECTION_INSURANCE).required(),
            FieldSpec::text("uitvaartverzekeringDetails", SECTION_INSURANCE)
                .shown_when(Condition::IsTrue("uitvaartverzekering")),
            FieldSpec::flag("testament", SECTION_TESTAMENT).required(),
            FieldSpec::text("testamentNotaris", SECTION_TESTAMENT)
                .shown_when(Condition::IsTrue("testament")),
            FieldSpec::text("executeur", SECTION_TESTAMENT),
            FieldSpec::flag("donorRegistratie", SECTION_DONOR),
            FieldSpec::text("donorToelichting", SECTION_DONOR),
            FieldSpec::text("dierbareBezittingen", SECTION_BELONGINGS),
            FieldSpec::text("belangrijkeDocumenten", SECTION_BELONGINGS),
        ],
        vec![
            Requirement::new("testamentNotaris", Condition::IsTrue("testament")),
            Requirement::new(
                "uitvaartverzekeringDetails",
                Condition::IsTrue("uitvaartverzekering"),
            ),
        ],
    )
}

/// Typed view of a practical-information record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PracticalInfo {
    pub volledige_naam: String,
    pub bsn: String,
    pub geboortedatum: String,
    pub banknummer: String,
    pub straat: String,
    pub huisnummer: String,
    pub postcode: String,
    pub woonplaats: String,
    pub provincie: String,
    pub land: String,
    pub telefoon: String,
    pub email: String,
    pub uitvaartverzekering: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uitvaartverzekering_details: Option<String>,
    pub testament: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub testament_notaris: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executeur: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donor_registratie: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donor_toelichting: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dierbare_bezittingen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub belangrijke_documenten: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_names_match_schema() {
        let schema = practical_info_schema();
        let value = serde_json::to_value(PracticalInfo {
            uitvaartverzekering_details: Some(String::new()),
            testament_notaris: Some(String::new()),
            executeur: Some(String::new()),
            donor_registratie: Some(false),
            donor_toelichting: Some(String::new()),
            dierbare_bezittingen: Some(String::new()),
            belangrijke_documenten: Some(String::new()),
            ..Default::default()
        })
        .unwrap();

        let typed: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        for spec in schema.fields() {
            assert!(typed.contains(&spec.name), "{} missing from PracticalInfo", spec.name);
        }
        assert_eq!(typed.len(), schema.fields().len());
    }

    #[test]
    fn test_defaults_follow_dutch_household() {
        let defaults = practical_info_schema().defaults();
        assert_eq!(defaults["land"], json!("Nederland"));
        assert_eq!(defaults["testament"], json!(false));
        assert_eq!(defaults["donorRegistratie"], json!(false));
    }

    #[test]
    fn test_notary_required_only_with_testament() {
        let schema = practical_info_schema();
        let mut values = schema.defaults();
        assert!(!schema.is_required("testamentNotaris", &values));

        values.insert("testament".into(), json!(true));
        assert!(schema.is_required("testamentNotaris", &values));
        assert!(schema.is_visible("testamentNotaris", &values));
    }
}
