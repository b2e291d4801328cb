//! The authenticated principal

use serde::{Deserialize, Serialize};

/// Opaque handle for a signed-in user; owns all of that user's records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub uid: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub mfa_enabled: bool,
}

/// Canonical form used for directory lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Anna@Example.NL "), "anna@example.nl");
    }

    #[test]
    fn test_identity_serializes_camel_case() {
        let identity = Identity {
            uid: "u1".into(),
            email: "anna@example.nl".into(),
            display_name: None,
            mfa_enabled: true,
        };
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["mfaEnabled"], true);
        assert!(json.get("displayName").is_some());
    }
}
