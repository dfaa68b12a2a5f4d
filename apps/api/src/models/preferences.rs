use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Structured recommendation preferences submitted by a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub interests: Vec<String>,
    #[serde(default)]
    pub credit_preference: Option<u32>,
    #[serde(default)]
    pub additional_info: Option<String>,
}

impl Preferences {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.interests.is_empty() {
            return Err(AppError::Validation(
                "at least one interest is required".to_string(),
            ));
        }
        if self.interests.iter().any(|i| i.trim().is_empty()) {
            return Err(AppError::Validation(
                "interests cannot be blank".to_string(),
            ));
        }
        if self.credit_preference == Some(0) {
            return Err(AppError::Validation(
                "creditPreference must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs(interests: &[&str], credits: Option<u32>) -> Preferences {
        Preferences {
            interests: interests.iter().map(|s| s.to_string()).collect(),
            credit_preference: credits,
            additional_info: None,
        }
    }

    #[test]
    fn test_client_payload_deserializes() {
        let json = r#"{"interests": ["Algorithms"], "creditPreference": 6, "additionalInfo": "I like proofs"}"#;
        let p: Preferences = serde_json::from_str(json).unwrap();
        assert_eq!(p.interests, vec!["Algorithms"]);
        assert_eq!(p.credit_preference, Some(6));
        assert_eq!(p.additional_info.as_deref(), Some("I like proofs"));
    }

    #[test]
    fn test_optional_fields_may_be_omitted() {
        let p: Preferences = serde_json::from_str(r#"{"interests": ["Robotics"]}"#).unwrap();
        assert!(p.credit_preference.is_none());
        assert!(p.additional_info.is_none());
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_empty_interests_rejected() {
        assert!(matches!(
            prefs(&[], None).validate(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_blank_interest_rejected() {
        assert!(matches!(
            prefs(&["Algorithms", "  "], None).validate(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_credit_target_rejected() {
        assert!(matches!(
            prefs(&["Algorithms"], Some(0)).validate(),
            Err(AppError::Validation(_))
        ));
    }
}
