//! Deployment settings shared by every pipeline stage.
//!
//! Values are loaded by the CLI from an optional TOML file and `TURMAS_*`
//! environment variables; this type only defines the shape and defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Overrides the school name found in the report header.
    pub school_name: Option<String>,
    pub school_id: u32,
    pub district_id: u32,
    /// Initial password assigned to generated accounts.
    pub default_password: String,
    pub role: String,
    pub status: String,
    pub email_domain: String,
    /// Prefix of machine-readable phone numbers.
    pub country_code: String,
    /// Source document used when none is given on the command line.
    pub default_source: Option<PathBuf>,
    /// Directory for derived output paths; defaults to the source's directory.
    pub output_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            school_name: None,
            school_id: 3,
            district_id: 1,
            default_password: "trocarSenh@".to_string(),
            role: "Aluno".to_string(),
            status: "active".to_string(),
            email_domain: "aluno.edu.es.gov.br".to_string(),
            country_code: "55".to_string(),
            default_source: None,
            output_dir: None,
        }
    }
}

impl Settings {
    /// Reject values that would produce unusable accounts.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.email_domain.trim().is_empty() || self.email_domain.contains('@') {
            return Err(CoreError::InvalidSetting {
                key: "email_domain",
                reason: format!("`{}` is not a bare domain", self.email_domain),
            });
        }
        if self.country_code.is_empty() || !self.country_code.chars().all(|c| c.is_ascii_digit()) {
            return Err(CoreError::InvalidSetting {
                key: "country_code",
                reason: format!("`{}` must contain only digits", self.country_code),
            });
        }
        if self.default_password.is_empty() {
            return Err(CoreError::InvalidSetting {
                key: "default_password",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.school_id, 3);
        assert_eq!(settings.district_id, 1);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"school_id": 7}"#).unwrap();
        assert_eq!(settings.school_id, 7);
        assert_eq!(settings.role, "Aluno");
    }

    #[test]
    fn test_rejects_domain_with_at_sign() {
        let settings = Settings {
            email_domain: "@escola.br".to_string(),
            ..Settings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidSetting { key: "email_domain", .. }));
    }

    #[test]
    fn test_rejects_non_numeric_country_code() {
        let settings = Settings {
            country_code: "+55".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }
}
