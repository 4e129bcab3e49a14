use crate::connection::{ConnectionTarget, DriverCandidates};
use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "regime.toml";

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error occurred while reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error occurred
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The file parsed but holds unusable values
    #[error(transparent)]
    Invalid(#[from] ConfigurationError),
}

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Stored procedure names
    #[serde(default)]
    pub procedures: Procedures,
}

/// Database connection configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQL Server host (optionally `host\instance`)
    pub server: String,
    /// Database name
    pub database: String,
    /// ODBC driver names, tried in order
    pub drivers: Vec<String>,
    /// Login timeout for each connection attempt, in seconds
    pub login_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            server: "SQL01".to_string(),
            database: "Aportes".to_string(),
            drivers: vec![
                "SQL Server Native Client 11.0".to_string(),
                "SQL Server Native Client 10.0".to_string(),
                "SQL Server".to_string(),
            ],
            login_timeout_secs: 5,
        }
    }
}

/// Fully qualified names of the stored procedures
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Procedures {
    /// Returns `Apeynom` and `Fec_nac` for a CUIL
    pub find_person: String,
    /// Returns the `REGIMEN` column for a CUIL
    pub current_regime: String,
    /// Takes `@CUIL` and `@NuevoRegimen`
    pub change_regime: String,
}

impl Default for Procedures {
    fn default() -> Self {
        Self {
            find_person: "Gestion.dbo.Anto_ObtenerPersonaPorCUIL".to_string(),
            current_regime: "Gestion.dbo.anto_regimenactual".to_string(),
            change_regime: "Gestion.dbo.Anto_CambiarRegimen".to_string(),
        }
    }
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Replaces `database.server`
    pub server: Option<String>,
    /// Replaces `database.database`
    pub database: Option<String>,
    /// Replaces the whole candidate list when non-empty
    pub drivers: Vec<String>,
    /// Replaces `database.login_timeout_secs`
    pub login_timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load an explicit file, or the default file when present, or built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if !path.exists() => Err(ConfigurationError::NotFound {
                path: path.display().to_string(),
            }
            .into()),
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Self::from_file(path)
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                debug!("Loading configuration from {}", DEFAULT_CONFIG_FILE);
                Self::from_file(DEFAULT_CONFIG_FILE)
            }
            None => {
                debug!("No configuration file, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Apply command-line overrides
    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(server) = overrides.server {
            self.database.server = server;
        }
        if let Some(database) = overrides.database {
            self.database.database = database;
        }
        if !overrides.drivers.is_empty() {
            self.database.drivers = overrides.drivers;
        }
        if let Some(timeout) = overrides.login_timeout_secs {
            self.database.login_timeout_secs = timeout;
        }
        self
    }

    /// Render as TOML, e.g. for writing a starter file
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl DatabaseConfig {
    /// The server/database pair
    #[must_use]
    pub fn target(&self) -> ConnectionTarget {
        ConnectionTarget::new(&self.server, &self.database)
    }

    /// The ordered candidate list
    pub fn candidates(&self) -> Result<DriverCandidates, ConfigurationError> {
        DriverCandidates::new(self.drivers.clone())
    }

    /// Per-attempt login timeout
    #[must_use]
    pub const fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.login_timeout_secs)
    }
}
