//! What the operator sees after a lookup

use crate::cuil::Cuil;
use crate::regime::Regime;
use crate::store::PersonRecord;
use serde::Serialize;
use std::fmt;

const NOT_FOUND: &str = "Not found";
const NOT_AVAILABLE: &str = "Not available";

/// Stored regime id with its catalog name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegimeStatus {
    /// Raw id as stored
    pub id: i32,
    /// Catalog name, `Desconocido` for ids outside the catalog
    pub name: &'static str,
}

impl RegimeStatus {
    /// Resolve a stored id against the catalog
    #[must_use]
    pub fn from_id(id: i32) -> Self {
        Self {
            id,
            name: Regime::name_for_id(id),
        }
    }

    /// The catalog entry, if the id is known
    #[must_use]
    pub fn regime(&self) -> Option<Regime> {
        Regime::from_id(self.id)
    }
}

/// Result of looking up one CUIL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonView {
    /// The CUIL that was looked up
    pub cuil: Cuil,
    /// Person data, `None` when the CUIL is unknown
    pub person: Option<PersonRecord>,
    /// Current regime, `None` when none is recorded
    pub regime: Option<RegimeStatus>,
}

impl PersonView {
    /// `Name:` line value
    #[must_use]
    pub fn name_text(&self) -> &str {
        self.person.as_ref().map_or(NOT_FOUND, |p| p.name.as_str())
    }

    /// `Birth date:` line value, `dd/mm/YYYY`
    #[must_use]
    pub fn birth_date_text(&self) -> String {
        match &self.person {
            None => NOT_FOUND.to_string(),
            Some(PersonRecord {
                birth_date: None, ..
            }) => NOT_AVAILABLE.to_string(),
            Some(PersonRecord {
                birth_date: Some(date),
                ..
            }) => date.format("%d/%m/%Y").to_string(),
        }
    }

    /// `Current regime:` line value
    #[must_use]
    pub fn regime_text(&self) -> String {
        self.regime.as_ref().map_or_else(
            || NOT_FOUND.to_string(),
            |status| format!("{} – {}", status.id, status.name),
        )
    }
}

impl fmt::Display for PersonView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CUIL: {}", self.cuil.formatted())?;
        writeln!(f, "Name: {}", self.name_text())?;
        writeln!(f, "Birth date: {}", self.birth_date_text())?;
        write!(f, "Current regime: {}", self.regime_text())
    }
}
