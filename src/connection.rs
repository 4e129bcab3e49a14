//! Database connection primitives
//!
//! [`Connector`] is the seam between the acquisition logic and a concrete
//! backend: it opens one connection with one named driver. The ODBC backend
//! lives in the `database` module (feature `odbc`); tests plug in their own.

use crate::errors::{ConfigurationError, DatabaseError};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Immutable server/database pair a connection is opened against
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionTarget {
    server: String,
    database: String,
}

impl ConnectionTarget {
    /// Create a new target
    #[must_use]
    pub fn new(server: &str, database: &str) -> Self {
        Self {
            server: server.to_string(),
            database: database.to_string(),
        }
    }

    /// Server host
    #[must_use]
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Database name
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// ODBC connection string using integrated (trusted) authentication
    #[must_use]
    pub fn connection_string(&self, driver: &str) -> String {
        format!(
            "DRIVER={{{driver}}};SERVER={};DATABASE={};Trusted_Connection=yes;",
            self.server, self.database
        )
    }
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.server, self.database)
    }
}

/// Ordered, non-empty list of driver names to try
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverCandidates(Vec<String>);

impl DriverCandidates {
    /// Build a candidate list; blank names are rejected
    pub fn new(drivers: Vec<String>) -> Result<Self, ConfigurationError> {
        if drivers.is_empty() {
            return Err(ConfigurationError::MissingField {
                field: "database.drivers".to_string(),
            });
        }
        if let Some(blank) = drivers.iter().find(|d| d.trim().is_empty()) {
            return Err(ConfigurationError::InvalidValue {
                field: "database.drivers".to_string(),
                value: format!("{blank:?}"),
            });
        }
        Ok(Self(drivers))
    }

    /// Iterate in try order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of candidates
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a constructed list
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Opens database connections with a named driver
pub trait Connector {
    /// Open session; released when dropped
    type Connection;

    /// Try to open one connection with `driver`, giving up after `timeout`
    fn connect(
        &self,
        target: &ConnectionTarget,
        driver: &str,
        timeout: Duration,
    ) -> Result<Self::Connection, DatabaseError>;

    /// Drivers installed on this machine, for diagnostics
    fn installed_drivers(&self) -> Result<Vec<String>, DatabaseError> {
        Ok(Vec::new())
    }
}
