//! Lookup and update operations
//!
//! Each operation acquires its own connection, does its work and drops the
//! connection before returning, whether it succeeded or not. Nothing is
//! cached between operations.

use crate::acquirer::ConnectionAcquirer;
use crate::config::{Config, Procedures};
use crate::connection::{ConnectionTarget, Connector, DriverCandidates};
use crate::cuil::Cuil;
use crate::errors::{RegimeError, RegimeResult};
use crate::regime::Regime;
use crate::store::RegimeStore;
use crate::view::{PersonView, RegimeStatus};
use std::time::Duration;
use tracing::{info, warn};

/// Everything needed to open a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Server/database pair
    pub target: ConnectionTarget,
    /// Driver names in try order
    pub candidates: DriverCandidates,
    /// Per-attempt login timeout
    pub timeout: Duration,
}

impl ConnectionSettings {
    /// Extract and check the connection settings of a configuration
    pub fn from_config(config: &Config) -> RegimeResult<Self> {
        let candidates = config
            .database
            .candidates()
            .map_err(|e| RegimeError::config(e, "configure"))?;

        Ok(Self {
            target: config.database.target(),
            candidates,
            timeout: config.database.login_timeout(),
        })
    }
}

/// A committed regime change and the record read back after it
///
/// The refresh runs on its own connection, so it can fail after the change
/// has already been persisted.
#[derive(Debug)]
pub struct UpdateOutcome {
    /// Person whose regime was changed
    pub cuil: Cuil,
    /// Regime that was written
    pub regime: Regime,
    /// Fresh lookup taken after the commit
    pub refreshed: RegimeResult<PersonView>,
}

/// Person lookup and regime update against the configured database
pub struct RegimeService<C> {
    acquirer: ConnectionAcquirer<C>,
    settings: ConnectionSettings,
    procedures: Procedures,
}

impl<C> RegimeService<C>
where
    C: Connector,
    C::Connection: RegimeStore,
{
    /// Build a service from explicit settings
    pub fn new(connector: C, settings: ConnectionSettings, procedures: Procedures) -> Self {
        Self {
            acquirer: ConnectionAcquirer::new(connector),
            settings,
            procedures,
        }
    }

    /// Build a service from a loaded configuration
    pub fn from_config(connector: C, config: &Config) -> RegimeResult<Self> {
        let settings = ConnectionSettings::from_config(config)?;
        Ok(Self::new(connector, settings, config.procedures.clone()))
    }

    /// Connection settings in use
    pub const fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    /// The backend connector
    pub const fn connector(&self) -> &C {
        self.acquirer.connector()
    }

    /// Validate raw operator input and look the person up
    pub fn lookup(&self, input: &str) -> RegimeResult<PersonView> {
        let cuil = parse_cuil(input, "lookup")?;
        self.lookup_cuil(&cuil)
    }

    /// Look up name, birth date and current regime
    pub fn lookup_cuil(&self, cuil: &Cuil) -> RegimeResult<PersonView> {
        let mut connection = self.open("lookup")?;

        let person = connection
            .find_person(&self.procedures, cuil)
            .map_err(|e| RegimeError::database(e, "lookup"))?;
        let regime = connection
            .current_regime(&self.procedures, cuil)
            .map_err(|e| RegimeError::database(e, "lookup"))?
            .map(RegimeStatus::from_id);

        if person.is_none() {
            info!("No person found for CUIL {}", cuil);
        }
        Ok(PersonView {
            cuil: cuil.clone(),
            person,
            regime,
        })
    }

    /// Validate raw operator input, change the regime and read the record back
    pub fn update(&self, input: &str, regime: Regime) -> RegimeResult<UpdateOutcome> {
        let cuil = parse_cuil(input, "update")?;
        self.update_cuil(&cuil, regime)
    }

    /// Change the regime, then look the person up again on a fresh connection
    ///
    /// An `Err` means nothing was written. Once the change is committed the
    /// call succeeds and any refresh failure is carried in the outcome.
    pub fn update_cuil(&self, cuil: &Cuil, regime: Regime) -> RegimeResult<UpdateOutcome> {
        {
            let mut connection = self.open("update")?;
            connection
                .change_regime(&self.procedures, cuil, regime)
                .map_err(|e| RegimeError::database(e, "update"))?;
        }
        info!("Regime for CUIL {} set to {}", cuil, regime);

        let refreshed = self.lookup_cuil(cuil);
        if let Err(e) = &refreshed {
            warn!("Regime change committed but the refresh failed: {}", e);
        }
        Ok(UpdateOutcome {
            cuil: cuil.clone(),
            regime,
            refreshed,
        })
    }

    fn open(&self, operation: &str) -> RegimeResult<C::Connection> {
        self.acquirer
            .acquire(
                &self.settings.target,
                &self.settings.candidates,
                self.settings.timeout,
            )
            .map_err(|e| match e {
                RegimeError::ConnectionUnavailable { .. } => {
                    RegimeError::connection_unavailable(operation, self.settings.candidates.len())
                }
                other => other,
            })
    }
}

fn parse_cuil(input: &str, operation: &str) -> RegimeResult<Cuil> {
    let cuil = Cuil::parse(input).map_err(|e| RegimeError::validation(e, operation))?;
    if !cuil.has_consistent_check_digit() {
        warn!("CUIL {} has an inconsistent check digit", cuil.formatted());
    }
    Ok(cuil)
}
