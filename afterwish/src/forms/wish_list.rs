//! Funeral wishes

use serde::{Deserialize, Serialize};

use super::rules::{Condition, Requirement, Rule};
use super::schema::{FieldSpec, FormSchema};
use crate::records::SingletonKind;

pub const COFFIN_OPTIONS: &[&str] = &["eiken", "grenen", "karton", "bamboe", "geen-voorkeur"];
pub const LAST_CARE_OPTIONS: &[&str] = &["thuis", "uitvaartcentrum", "geen-voorkeur"];
pub const LAYING_OUT_OPTIONS: &[&str] = &["thuis", "uitvaartcentrum"];
pub const FUNERAL_TYPE_OPTIONS: &[&str] = &["begraven", "cremeren"];

pub const BURIAL: &str = "begraven";

pub const SECTION_NOTICE: &str = "Kennisgeving";
pub const SECTION_CARE: &str = "Verzorging en opbaring";
pub const SECTION_FUNERAL: &str = "Uitvaart";
pub const SECTION_CEREMONY: &str = "Ceremonie";

pub fn wish_list_schema() -> FormSchema {
    FormSchema::new(
        SingletonKind::WishList,
        vec![
            FieldSpec::flag("overlijdensbericht", SECTION_NOTICE).required(),
            FieldSpec::text("kennisgevingDetails", SECTION_NOTICE)
                .shown_when(Condition::IsTrue("overlijdensbericht")),
            FieldSpec::text("doodskist", SECTION_CARE)
                .required()
                .rule(Rule::OneOf(COFFIN_OPTIONS)),
            FieldSpec::text("laatsteVerzorging", SECTION_CARE)
                .required()
                .rule(Rule::OneOf(LAST_CARE_OPTIONS)),
            FieldSpec::text("opbaringLocatie", SECTION_CARE)
                .required()
                .default_text("thuis")
                .rule(Rule::OneOf(LAYING_OUT_OPTIONS)),
            FieldSpec::text("soortUitvaart", SECTION_FUNERAL)
                .required()
                .default_text(BURIAL)
                .rule(Rule::OneOf(FUNERAL_TYPE_OPTIONS)),
            FieldSpec::flag("familieGraf", SECTION_FUNERAL)
                .no_default()
                .shown_when(Condition::Equals("soortUitvaart", BURIAL)),
            FieldSpec::text("begraafplaats", SECTION_FUNERAL)
                .shown_when(Condition::Equals("soortUitvaart", BURIAL)),
            FieldSpec::flag("naCeremonie", SECTION_CEREMONY).required(),
            FieldSpec::flag("laatsteSamenkomst", SECTION_CEREMONY).required(),
            FieldSpec::text("ceremoniDetails", SECTION_CEREMONY),
            FieldSpec::text("muziekWensen", SECTION_CEREMONY),
            FieldSpec::text("bloemenWensen", SECTION_CEREMONY),
            FieldSpec::text("condoleanceVoorkeuren", SECTION_CEREMONY),
            FieldSpec::text("genodigdenLijst", SECTION_CEREMONY),
        ],
        vec![Requirement::new(
            "begraafplaats",
            Condition::Equals("soortUitvaart", BURIAL),
        )],
    )
}

/// Typed view of a wish-list record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WishList {
    pub overlijdensbericht: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kennisgeving_details: Option<String>,
    pub doodskist: String,
    pub laatste_verzorging: String,
    pub opbaring_locatie: String,
    pub soort_uitvaart: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub familie_graf: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begraafplaats: Option<String>,
    pub na_ceremonie: bool,
    pub laatste_samenkomst: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ceremoni_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muziek_wensen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bloemen_wensen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condoleance_voorkeuren: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genodigden_lijst: Option<String>,
}

impl WishList {
    pub fn is_burial(&self) -> bool {
        self.soort_uitvaart == BURIAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cemetery_follows_funeral_type() {
        let schema = wish_list_schema();
        let mut values = schema.defaults();
        assert!(schema.is_required("begraafplaats", &values));
        assert!(schema.is_visible("familieGraf", &values));

        values.insert("soortUitvaart".into(), json!("cremeren"));
        assert!(!schema.is_required("begraafplaats", &values));
        assert!(!schema.is_visible("familieGraf", &values));
    }

    #[test]
    fn test_typed_view_decodes_stored_record() {
        let wishes: WishList = serde_json::from_value(json!({
            "overlijdensbericht": true,
            "doodskist": "eiken",
            "laatsteVerzorging": "thuis",
            "opbaringLocatie": "thuis",
            "soortUitvaart": "begraven",
            "begraafplaats": "Zorgvlied",
            "naCeremonie": false,
            "laatsteSamenkomst": true,
            "lastUpdated": "2024-05-01T10:00:00.000Z"
        }))
        .unwrap();
        assert!(wishes.is_burial());
        assert_eq!(wishes.begraafplaats.as_deref(), Some("Zorgvlied"));
        assert_eq!(wishes.familie_graf, None);
    }
}
