//! Error handling for regime-manager
//!
//! Every library error carries an [`ErrorContext`] describing the operation
//! and component it came from, plus a severity that drives how it is logged.
//! Operators see [`RegimeError::user_message`]; logs get the full chain.

use std::fmt;
use thiserror::Error;
use tracing::{error, info};

/// The main error type for regime-manager operations
#[derive(Debug, Clone, Error)]
pub enum RegimeError {
    /// No candidate driver produced a working connection
    #[error("Could not establish a connection to SQL Server")]
    ConnectionUnavailable {
        /// Where the acquisition was attempted
        context: Box<ErrorContext>,
    },

    /// Configuration-related errors
    #[error("Configuration error: {source}")]
    Config {
        /// Underlying configuration problem
        source: ConfigurationError,
        /// Where the error was raised
        context: Box<ErrorContext>,
    },

    /// Failures while executing a stored procedure
    #[error("Database error: {source}")]
    Database {
        /// Underlying database problem
        source: DatabaseError,
        /// Where the error was raised
        context: Box<ErrorContext>,
    },

    /// Malformed operator input
    #[error("Validation error: {source}")]
    Validation {
        /// Underlying validation problem
        source: ValidationError,
        /// Where the error was raised
        context: Box<ErrorContext>,
    },
}

/// Configuration-specific errors
#[derive(Debug, Clone, Error)]
pub enum ConfigurationError {
    /// An explicitly named config file does not exist
    #[error("Configuration file not found: {path}")]
    NotFound {
        /// Path as given on the command line
        path: String,
    },

    /// A required setting is absent or empty
    #[error("Missing required configuration: {field}")]
    MissingField {
        /// Dotted setting name, e.g. `database.drivers`
        field: String,
    },

    /// A setting is present but unusable
    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue {
        /// Dotted setting name
        field: String,
        /// The rejected value
        value: String,
    },
}

/// Database-specific errors
#[derive(Debug, Clone, Error)]
pub enum DatabaseError {
    /// One connection attempt failed
    #[error("Connection failed with driver '{driver}': {details}")]
    ConnectionFailed {
        /// Driver name that was tried
        driver: String,
        /// Driver manager diagnostics
        details: String,
    },

    /// A stored procedure call failed
    #[error("Stored procedure {procedure} failed: {details}")]
    ProcedureFailed {
        /// Fully qualified procedure name
        procedure: String,
        /// Driver diagnostics
        details: String,
    },

    /// A column held something that could not be interpreted
    #[error("Unexpected value in column {column}: {value}")]
    UnexpectedValue {
        /// Column name or position
        column: String,
        /// Raw text that was read
        value: String,
    },

    /// The driver manager could not list its drivers
    #[error("Could not list installed drivers: {details}")]
    DriverEnumeration {
        /// Driver manager diagnostics
        details: String,
    },

    /// The ODBC environment could not be created
    #[error("No database backend available: {details}")]
    BackendUnavailable {
        /// Driver manager diagnostics
        details: String,
    },
}

/// Validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Input is not 11 digits
    #[error("CUIL must be exactly 11 numeric digits, got '{value}'")]
    InvalidCuil {
        /// Input as typed
        value: String,
    },

    /// Input names no catalog regime
    #[error("Unknown regime '{value}' (expected 1, 2, 3 or a regime name)")]
    UnknownRegime {
        /// Input as typed
        value: String,
    },
}

/// Error context provides additional information about when and where an error occurred
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Operation being performed when error occurred
    pub operation: String,

    /// Component where error originated
    pub component: String,

    /// Additional context information
    pub details: std::collections::HashMap<String, String>,

    /// Timestamp when error occurred
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Error severity level
    pub severity: ErrorSeverity,
}

/// Error severity levels (ordered from lowest to highest severity)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Low priority errors, mostly informational
    Low,

    /// High priority errors that affect functionality
    High,

    /// Critical errors that require immediate attention
    Critical,
}

impl ErrorContext {
    /// Create a new error context
    #[must_use]
    pub fn new(operation: &str, component: &str) -> Self {
        Self {
            operation: operation.to_string(),
            component: component.to_string(),
            details: std::collections::HashMap::new(),
            timestamp: chrono::Utc::now(),
            severity: ErrorSeverity::High,
        }
    }

    /// Set the severity level
    #[must_use]
    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// Add additional context detail
    #[must_use]
    pub fn with_detail(mut self, key: &str, value: &str) -> Self {
        self.details.insert(key.to_string(), value.to_string());
        self
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "CRITICAL"),
            Self::High => write!(f, "HIGH"),
            Self::Low => write!(f, "LOW"),
        }
    }
}

/// Result type for regime-manager operations
pub type RegimeResult<T> = Result<T, RegimeError>;

impl RegimeError {
    /// All candidate drivers failed
    #[must_use]
    pub fn connection_unavailable(operation: &str, candidates: usize) -> Self {
        Self::ConnectionUnavailable {
            context: Box::new(
                ErrorContext::new(operation, "acquirer")
                    .with_severity(ErrorSeverity::Critical)
                    .with_detail("candidates", &candidates.to_string()),
            ),
        }
    }

    /// Wrap a configuration problem
    #[must_use]
    pub fn config(source: ConfigurationError, operation: &str) -> Self {
        Self::Config {
            source,
            context: Box::new(
                ErrorContext::new(operation, "config").with_severity(ErrorSeverity::High),
            ),
        }
    }

    /// Wrap a stored-procedure failure
    #[must_use]
    pub fn database(source: DatabaseError, operation: &str) -> Self {
        Self::Database {
            source,
            context: Box::new(
                ErrorContext::new(operation, "store").with_severity(ErrorSeverity::High),
            ),
        }
    }

    /// Wrap an input validation failure
    #[must_use]
    pub fn validation(source: ValidationError, operation: &str) -> Self {
        Self::Validation {
            source,
            context: Box::new(
                ErrorContext::new(operation, "input").with_severity(ErrorSeverity::Low),
            ),
        }
    }

    /// Get the error context
    #[must_use]
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::ConnectionUnavailable { context }
            | Self::Config { context, .. }
            | Self::Database { context, .. }
            | Self::Validation { context, .. } => context,
        }
    }

    /// Log the error with appropriate level based on severity
    pub fn log(&self) {
        match self.context().severity {
            ErrorSeverity::Critical | ErrorSeverity::High => {
                error!(
                    error = %self,
                    operation = %self.context().operation,
                    component = %self.context().component,
                    severity = %self.context().severity,
                    at = %self.context().timestamp.to_rfc3339(),
                    "Error occurred"
                );
            }
            ErrorSeverity::Low => {
                info!(
                    error = %self,
                    operation = %self.context().operation,
                    component = %self.context().component,
                    at = %self.context().timestamp.to_rfc3339(),
                    "Rejected input"
                );
            }
        }
    }

    /// Get the message shown to the operator
    ///
    /// Database failures are reported generically; the details only go to the log.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ConnectionUnavailable { .. } => {
                "Could not establish a connection to SQL Server. \
                 Check the installed drivers and your credentials."
                    .to_string()
            }
            Self::Config { source, .. } => format!("Configuration issue: {source}"),
            Self::Database { context, .. } if context.operation == "update" => {
                "Could not update the regime.".to_string()
            }
            Self::Database { .. } => "Could not fetch the data.".to_string(),
            Self::Validation { source, .. } => format!("Invalid input: {source}"),
        }
    }

    /// Whether the operator can fix the problem by retyping input
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
