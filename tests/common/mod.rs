/// Shared test utilities: an in-memory database behind a scripted connector
use regime_manager::config::{Config, Procedures};
use regime_manager::errors::DatabaseError;
use regime_manager::{
    ConnectionTarget, Connector, Cuil, PersonRecord, Regime, RegimeService, RegimeStore,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

#[allow(dead_code)]
pub const KNOWN_CUIL: &str = "20123456786";
#[allow(dead_code)]
pub const UNKNOWN_CUIL: &str = "27000000006";

/// Everything the fake backend has seen
#[derive(Debug, Default)]
pub struct Ledger {
    /// Driver names in the order they were tried
    pub attempts: Vec<String>,
    /// Connections handed out
    pub opened: usize,
    /// Connections dropped
    pub released: usize,
    /// Procedures executed, in order
    pub executed: Vec<String>,
}

#[derive(Debug, Default)]
struct State {
    people: HashMap<String, PersonRecord>,
    regimes: HashMap<String, i32>,
    failing_procedure: Option<String>,
    ledger: Ledger,
}

/// Connector that only opens connections for the listed drivers
#[derive(Clone)]
pub struct FakeConnector {
    working: Vec<String>,
    installed: Vec<String>,
    state: Rc<RefCell<State>>,
}

#[allow(dead_code)]
impl FakeConnector {
    pub fn new(working: &[&str]) -> Self {
        Self {
            working: working.iter().map(ToString::to_string).collect(),
            installed: working.iter().map(ToString::to_string).collect(),
            state: Rc::new(RefCell::new(State::default())),
        }
    }

    /// Seed one person with a stored regime id
    pub fn with_person(
        self,
        cuil: &str,
        name: &str,
        birth: Option<(i32, u32, u32)>,
        regime: i32,
    ) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.people.insert(
                cuil.to_string(),
                PersonRecord {
                    name: name.to_string(),
                    birth_date: birth
                        .and_then(|(y, m, d)| chrono::NaiveDate::from_ymd_opt(y, m, d)),
                },
            );
            state.regimes.insert(cuil.to_string(), regime);
        }
        self
    }

    /// Make every call to `procedure` fail
    pub fn failing(self, procedure: &str) -> Self {
        self.state.borrow_mut().failing_procedure = Some(procedure.to_string());
        self
    }

    pub fn attempts(&self) -> Vec<String> {
        self.state.borrow().ledger.attempts.clone()
    }

    pub fn opened(&self) -> usize {
        self.state.borrow().ledger.opened
    }

    pub fn released(&self) -> usize {
        self.state.borrow().ledger.released
    }

    pub fn executed(&self) -> Vec<String> {
        self.state.borrow().ledger.executed.clone()
    }

    pub fn stored_regime(&self, cuil: &str) -> Option<i32> {
        self.state.borrow().regimes.get(cuil).copied()
    }
}

impl Connector for FakeConnector {
    type Connection = FakeConnection;

    fn connect(
        &self,
        _target: &ConnectionTarget,
        driver: &str,
        _timeout: Duration,
    ) -> Result<FakeConnection, DatabaseError> {
        let mut state = self.state.borrow_mut();
        state.ledger.attempts.push(driver.to_string());

        if self.working.iter().any(|d| d == driver) {
            state.ledger.opened += 1;
            Ok(FakeConnection {
                state: Rc::clone(&self.state),
                driver: driver.to_string(),
            })
        } else {
            Err(DatabaseError::ConnectionFailed {
                driver: driver.to_string(),
                details: "[IM002] Data source name not found".to_string(),
            })
        }
    }

    fn installed_drivers(&self) -> Result<Vec<String>, DatabaseError> {
        Ok(self.installed.clone())
    }
}

/// Open fake session; counts its own release
pub struct FakeConnection {
    state: Rc<RefCell<State>>,
    #[allow(dead_code)]
    pub driver: String,
}

impl Drop for FakeConnection {
    fn drop(&mut self) {
        self.state.borrow_mut().ledger.released += 1;
    }
}

impl FakeConnection {
    fn run(&self, procedure: &str) -> Result<(), DatabaseError> {
        let mut state = self.state.borrow_mut();
        state.ledger.executed.push(procedure.to_string());
        if state.failing_procedure.as_deref() == Some(procedure) {
            return Err(DatabaseError::ProcedureFailed {
                procedure: procedure.to_string(),
                details: "[42000] Could not find stored procedure".to_string(),
            });
        }
        Ok(())
    }
}

impl RegimeStore for FakeConnection {
    fn find_person(
        &mut self,
        procedures: &Procedures,
        cuil: &Cuil,
    ) -> Result<Option<PersonRecord>, DatabaseError> {
        self.run(&procedures.find_person)?;
        Ok(self.state.borrow().people.get(cuil.as_str()).cloned())
    }

    fn current_regime(
        &mut self,
        procedures: &Procedures,
        cuil: &Cuil,
    ) -> Result<Option<i32>, DatabaseError> {
        self.run(&procedures.current_regime)?;
        Ok(self.state.borrow().regimes.get(cuil.as_str()).copied())
    }

    fn change_regime(
        &mut self,
        procedures: &Procedures,
        cuil: &Cuil,
        regime: Regime,
    ) -> Result<(), DatabaseError> {
        self.run(&procedures.change_regime)?;
        self.state
            .borrow_mut()
            .regimes
            .insert(cuil.as_str().to_string(), regime.id());
        Ok(())
    }
}

/// Service over the fake backend with the given candidate list
#[allow(dead_code)]
pub fn service_with(connector: FakeConnector, drivers: &[&str]) -> RegimeService<FakeConnector> {
    let mut config = Config::default();
    config.database.drivers = drivers.iter().map(ToString::to_string).collect();
    RegimeService::from_config(connector, &config).expect("valid test configuration")
}
