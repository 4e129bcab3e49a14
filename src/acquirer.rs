//! Connection acquisition with driver fallback
//!
//! Candidates are tried once each, in order. The first connection that opens
//! is returned and later candidates are never touched. When every candidate
//! fails the caller gets a single [`RegimeError::ConnectionUnavailable`]; the
//! per-driver failures only reach the log. There is no retry over the list
//! and no backoff.

use crate::connection::{ConnectionTarget, Connector, DriverCandidates};
use crate::errors::{ConfigurationError, RegimeError, RegimeResult};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Opens a connection by walking a driver candidate list
#[derive(Debug, Clone)]
pub struct ConnectionAcquirer<C> {
    connector: C,
}

impl<C: Connector> ConnectionAcquirer<C> {
    /// Wrap a backend connector
    pub const fn new(connector: C) -> Self {
        Self { connector }
    }

    /// The wrapped connector
    pub const fn connector(&self) -> &C {
        &self.connector
    }

    /// Open a connection to `target` with the first candidate that works
    pub fn acquire(
        &self,
        target: &ConnectionTarget,
        candidates: &DriverCandidates,
        timeout: Duration,
    ) -> RegimeResult<C::Connection> {
        if timeout.is_zero() {
            return Err(RegimeError::config(
                ConfigurationError::InvalidValue {
                    field: "database.login_timeout_secs".to_string(),
                    value: "0".to_string(),
                },
                "acquire",
            ));
        }
        if candidates.is_empty() {
            return Err(RegimeError::config(
                ConfigurationError::MissingField {
                    field: "database.drivers".to_string(),
                },
                "acquire",
            ));
        }

        info!("Acquiring connection to {}", target);
        self.log_installed_drivers();

        let start = Instant::now();
        for (index, driver) in candidates.iter().enumerate() {
            debug!(
                "Trying driver '{}' (candidate {}/{})",
                driver,
                index + 1,
                candidates.len()
            );

            match self.connector.connect(target, driver, timeout) {
                Ok(connection) => {
                    info!(
                        "Connected to {} with driver '{}' after {:?}",
                        target,
                        driver,
                        start.elapsed()
                    );
                    return Ok(connection);
                }
                Err(e) => {
                    warn!("Connection with driver '{}' failed: {}", driver, e);
                }
            }
        }

        error!(
            "Could not connect to {} with any of {} candidate drivers",
            target,
            candidates.len()
        );
        Err(RegimeError::connection_unavailable("acquire", candidates.len()))
    }

    fn log_installed_drivers(&self) {
        match self.connector.installed_drivers() {
            Ok(drivers) if drivers.is_empty() => debug!("No installed drivers reported"),
            Ok(drivers) => debug!("Installed drivers: {}", drivers.join(", ")),
            Err(e) => debug!("Could not list installed drivers: {}", e),
        }
    }
}
