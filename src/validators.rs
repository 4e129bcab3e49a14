//! Configuration validation
//!
//! Errors make the configuration unusable; warnings are logged and shown by
//! `regime config` but do not stop the tool.

use crate::config::{Config, DatabaseConfig, Procedures};
use crate::errors::ConfigurationError;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Login timeouts above this are almost certainly a typo
const MAX_REASONABLE_TIMEOUT_SECS: u64 = 120;

/// Configuration validator
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Validation result with details about issues found
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Whether validation passed overall
    pub is_valid: bool,

    /// Validation passes but with concerns
    pub warnings: Vec<ValidationWarning>,

    /// Validation fails
    pub errors: Vec<ConfigurationError>,
}

/// A concern that does not make the configuration unusable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Dotted path of the offending field
    pub field: String,
    /// What looks wrong
    pub message: String,
}

impl ValidationResult {
    /// First error, if any
    #[must_use]
    pub fn first_error(&self) -> Option<&ConfigurationError> {
        self.errors.first()
    }
}

impl ConfigValidator {
    /// Create a new configuration validator
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validate a complete configuration
    #[must_use]
    pub fn validate(&self, config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_database_config(&config.database, &mut result);
        self.validate_procedures(&config.procedures, &mut result);

        result.is_valid = result.errors.is_empty();

        if result.is_valid {
            info!(
                "Configuration validation passed with {} warnings",
                result.warnings.len()
            );
        } else {
            warn!(
                "Configuration validation failed with {} errors",
                result.errors.len()
            );
        }
        for warning in &result.warnings {
            warn!("{}: {}", warning.field, warning.message);
        }

        result
    }

    fn validate_database_config(&self, db_config: &DatabaseConfig, result: &mut ValidationResult) {
        debug!("Validating database configuration");

        if db_config.server.trim().is_empty() {
            result.errors.push(ConfigurationError::MissingField {
                field: "database.server".to_string(),
            });
        }

        if db_config.database.trim().is_empty() {
            result.errors.push(ConfigurationError::MissingField {
                field: "database.database".to_string(),
            });
        }

        if let Err(e) = db_config.candidates() {
            result.errors.push(e);
        }

        let mut seen = HashSet::new();
        for driver in &db_config.drivers {
            if !seen.insert(driver.trim().to_lowercase()) {
                result.warnings.push(ValidationWarning {
                    field: "database.drivers".to_string(),
                    message: format!("Driver '{driver}' is listed more than once"),
                });
            }
            if driver.contains(['{', '}', ';']) {
                result.errors.push(ConfigurationError::InvalidValue {
                    field: "database.drivers".to_string(),
                    value: driver.clone(),
                });
            }
        }

        if db_config.login_timeout_secs == 0 {
            result.errors.push(ConfigurationError::InvalidValue {
                field: "database.login_timeout_secs".to_string(),
                value: "0".to_string(),
            });
        } else if db_config.login_timeout_secs > MAX_REASONABLE_TIMEOUT_SECS {
            result.warnings.push(ValidationWarning {
                field: "database.login_timeout_secs".to_string(),
                message: format!(
                    "{}s per driver may leave the operator waiting a long time",
                    db_config.login_timeout_secs
                ),
            });
        }

        for (field, value) in [
            ("database.server", &db_config.server),
            ("database.database", &db_config.database),
        ] {
            if value.contains(';') {
                result.errors.push(ConfigurationError::InvalidValue {
                    field: field.to_string(),
                    value: value.clone(),
                });
            }
        }
    }

    fn validate_procedures(&self, procedures: &Procedures, result: &mut ValidationResult) {
        debug!("Validating procedure names");

        for (field, name) in [
            ("procedures.find_person", &procedures.find_person),
            ("procedures.current_regime", &procedures.current_regime),
            ("procedures.change_regime", &procedures.change_regime),
        ] {
            if name.trim().is_empty() {
                result.errors.push(ConfigurationError::MissingField {
                    field: field.to_string(),
                });
            } else if !is_object_name(name) {
                result.errors.push(ConfigurationError::InvalidValue {
                    field: field.to_string(),
                    value: name.clone(),
                });
            }
        }
    }
}

fn object_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:\[\w+\]|\w+)(?:\.(?:\[\w+\]|\w+))*$")
            .expect("object name pattern is a valid regex")
    })
}

/// `[db.][schema.]name` made of word characters or bracketed parts
fn is_object_name(name: &str) -> bool {
    object_name_pattern().is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let result = ConfigValidator::new().validate(&Config::default());
        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_empty_drivers_and_zero_timeout_fail() {
        let mut config = Config::default();
        config.database.drivers.clear();
        config.database.login_timeout_secs = 0;

        let result = ConfigValidator::new().validate(&config);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_duplicate_driver_warns() {
        let mut config = Config::default();
        config.database.drivers.push("sql server".to_string());

        let result = ConfigValidator::new().validate(&config);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].field, "database.drivers");
    }

    #[test]
    fn test_connection_string_injection_rejected() {
        let mut config = Config::default();
        config.database.server = "SQL01;UID=sa".to_string();
        config.database.drivers = vec!["SQL Server};X={".to_string()];

        let result = ConfigValidator::new().validate(&config);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_procedure_names() {
        assert!(is_object_name("Gestion.dbo.Anto_CambiarRegimen"));
        assert!(is_object_name("[Gestion].[dbo].[anto_regimenactual]"));
        assert!(!is_object_name("dbo.x; DROP TABLE y"));
        assert!(!is_object_name("Gestion..proc"));
        assert!(!is_object_name("[Gestion.dbo.proc"));
        assert!(!is_object_name("Gestion.dbo.proc."));
        assert!(!is_object_name(""));
    }
}
