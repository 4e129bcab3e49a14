//! # ODBC Backend
//!
//! Opens SQL Server connections through the system ODBC driver manager using
//! integrated authentication, and runs the regime stored procedures over them.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use regime_manager::config::Config;
//! use regime_manager::database::OdbcConnector;
//! use regime_manager::RegimeService;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = RegimeService::from_config(OdbcConnector::new()?, &Config::default())?;
//! let view = service.lookup("20123456786")?;
//! println!("{view}");
//! # Ok(())
//! # }
//! ```

use crate::config::Procedures;
use crate::connection::{ConnectionTarget, Connector};
use crate::cuil::Cuil;
use crate::errors::DatabaseError;
use crate::regime::Regime;
use crate::store::{parse_birth_date, parse_regime_id, PersonRecord, RegimeStore};
use odbc_api::{
    ConnectionOptions, Cursor, CursorRow, Environment, IntoParameter, ResultSetMetadata,
};
use std::time::Duration;
use tracing::{debug, error};

/// Connector backed by the ODBC driver manager
#[derive(Clone, Copy)]
pub struct OdbcConnector {
    env: &'static Environment,
}

impl OdbcConnector {
    /// Allocate the ODBC environment
    ///
    /// The environment lives for the rest of the process so connections can
    /// be handed out without borrowing from the connector.
    pub fn new() -> Result<Self, DatabaseError> {
        let env = Environment::new().map_err(|e| DatabaseError::BackendUnavailable {
            details: e.to_string(),
        })?;
        Ok(Self {
            env: Box::leak(Box::new(env)),
        })
    }
}

impl Connector for OdbcConnector {
    type Connection = OdbcConnection;

    fn connect(
        &self,
        target: &ConnectionTarget,
        driver: &str,
        timeout: Duration,
    ) -> Result<OdbcConnection, DatabaseError> {
        let connection_string = target.connection_string(driver);
        let options = ConnectionOptions {
            login_timeout_sec: Some(u32::try_from(timeout.as_secs()).unwrap_or(u32::MAX)),
            ..ConnectionOptions::default()
        };

        let conn = self
            .env
            .connect_with_connection_string(&connection_string, options)
            .map_err(|e| DatabaseError::ConnectionFailed {
                driver: driver.to_string(),
                details: e.to_string(),
            })?;

        Ok(OdbcConnection {
            conn,
            driver: driver.to_string(),
        })
    }

    fn installed_drivers(&self) -> Result<Vec<String>, DatabaseError> {
        self.env
            .drivers()
            .map(|drivers| drivers.into_iter().map(|d| d.description).collect())
            .map_err(|e| DatabaseError::DriverEnumeration {
                details: e.to_string(),
            })
    }
}

/// One open ODBC session; closed on drop
pub struct OdbcConnection {
    conn: odbc_api::Connection<'static>,
    driver: String,
}

impl OdbcConnection {
    /// Driver this session was opened with
    #[must_use]
    pub fn driver(&self) -> &str {
        &self.driver
    }
}

impl Drop for OdbcConnection {
    fn drop(&mut self) {
        debug!("Releasing connection opened with '{}'", self.driver);
    }
}

fn procedure_failed(procedure: &str, e: &odbc_api::Error) -> DatabaseError {
    error!("Stored procedure {} failed: {}", procedure, e);
    DatabaseError::ProcedureFailed {
        procedure: procedure.to_string(),
        details: e.to_string(),
    }
}

/// 1-based index of `name` in the result set, matched case-insensitively
fn column_index(
    cursor: &mut impl ResultSetMetadata,
    name: &str,
) -> Result<Option<u16>, odbc_api::Error> {
    let count = cursor.num_result_cols()?;
    for index in 1..=u16::try_from(count).unwrap_or(0) {
        if cursor.col_name(index)?.eq_ignore_ascii_case(name) {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

fn execute_update(
    conn: &odbc_api::Connection<'static>,
    sql: &str,
    cuil: &Cuil,
    regime: Regime,
) -> Result<(), odbc_api::Error> {
    let mut prepared = conn.prepare(sql)?;
    let regime_id = regime.id();
    prepared.execute((&cuil.as_str().into_parameter(), &regime_id))?;
    conn.commit()
}

fn read_text(row: &mut CursorRow<'_>, index: u16) -> Result<Option<String>, odbc_api::Error> {
    let mut buf = Vec::new();
    if row.get_text(index, &mut buf)? {
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    } else {
        Ok(None)
    }
}

impl RegimeStore for OdbcConnection {
    fn find_person(
        &mut self,
        procedures: &Procedures,
        cuil: &Cuil,
    ) -> Result<Option<PersonRecord>, DatabaseError> {
        let procedure = &procedures.find_person;
        let sql = format!("EXEC {procedure} @CUIL = ?");
        debug!("Executing {}", procedure);

        let fail = |e: odbc_api::Error| procedure_failed(procedure, &e);
        let mut prepared = self.conn.prepare(&sql).map_err(fail)?;
        let Some(mut cursor) = prepared
            .execute(&cuil.as_str().into_parameter())
            .map_err(fail)?
        else {
            return Ok(None);
        };

        let name_col = column_index(&mut cursor, "Apeynom").map_err(fail)?.unwrap_or(1);
        let birth_col = column_index(&mut cursor, "Fec_nac").map_err(fail)?.unwrap_or(2);

        let Some(mut row) = cursor.next_row().map_err(fail)? else {
            return Ok(None);
        };
        let name = read_text(&mut row, name_col).map_err(fail)?.unwrap_or_default();
        let birth_date = match read_text(&mut row, birth_col).map_err(fail)? {
            Some(raw) => parse_birth_date(&raw)?,
            None => None,
        };

        Ok(Some(PersonRecord {
            name: name.trim().to_string(),
            birth_date,
        }))
    }

    fn current_regime(
        &mut self,
        procedures: &Procedures,
        cuil: &Cuil,
    ) -> Result<Option<i32>, DatabaseError> {
        let procedure = &procedures.current_regime;
        let sql = format!("EXEC {procedure} @CUIL = ?");
        debug!("Executing {}", procedure);

        let fail = |e: odbc_api::Error| procedure_failed(procedure, &e);
        let mut prepared = self.conn.prepare(&sql).map_err(fail)?;
        let Some(mut cursor) = prepared
            .execute(&cuil.as_str().into_parameter())
            .map_err(fail)?
        else {
            return Ok(None);
        };

        let regime_col = column_index(&mut cursor, "REGIMEN").map_err(fail)?.unwrap_or(1);
        let Some(mut row) = cursor.next_row().map_err(fail)? else {
            return Ok(None);
        };

        match read_text(&mut row, regime_col).map_err(fail)? {
            Some(raw) => parse_regime_id(&raw).map(Some),
            None => Ok(None),
        }
    }

    fn change_regime(
        &mut self,
        procedures: &Procedures,
        cuil: &Cuil,
        regime: Regime,
    ) -> Result<(), DatabaseError> {
        let procedure = &procedures.change_regime;
        let sql = format!("EXEC {procedure} @CUIL = ?, @NuevoRegimen = ?");
        debug!("Executing {} with regime {}", procedure, regime.id());

        let fail = |e: odbc_api::Error| procedure_failed(procedure, &e);
        self.conn.set_autocommit(false).map_err(fail)?;

        if let Err(e) = execute_update(&self.conn, &sql, cuil, regime) {
            if let Err(rollback) = self.conn.rollback() {
                error!("Rollback after failed update also failed: {}", rollback);
            }
            return Err(fail(e));
        }
        Ok(())
    }
}
