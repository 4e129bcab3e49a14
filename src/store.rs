//! Stored-procedure calls over one open connection

use crate::config::Procedures;
use crate::cuil::Cuil;
use crate::errors::DatabaseError;
use crate::regime::Regime;
use chrono::NaiveDate;
use serde::Serialize;

/// Person data returned by the lookup procedure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonRecord {
    /// Full name (`Apeynom`)
    pub name: String,
    /// Birth date (`Fec_nac`), when recorded
    pub birth_date: Option<NaiveDate>,
}

/// The three stored routines the tool relies on
pub trait RegimeStore {
    /// Person record for `cuil`, `None` when the procedure returns no row
    fn find_person(
        &mut self,
        procedures: &Procedures,
        cuil: &Cuil,
    ) -> Result<Option<PersonRecord>, DatabaseError>;

    /// Stored regime id for `cuil`, `None` when the procedure returns no row
    fn current_regime(
        &mut self,
        procedures: &Procedures,
        cuil: &Cuil,
    ) -> Result<Option<i32>, DatabaseError>;

    /// Persist a new regime for `cuil` and commit
    fn change_regime(
        &mut self,
        procedures: &Procedures,
        cuil: &Cuil,
        regime: Regime,
    ) -> Result<(), DatabaseError>;
}

/// Parse a `Fec_nac` value as rendered by the driver
///
/// Accepts a bare date or a datetime with optional fractional seconds.
pub fn parse_birth_date(raw: &str) -> Result<Option<NaiveDate>, DatabaseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| DatabaseError::UnexpectedValue {
            column: "Fec_nac".to_string(),
            value: trimmed.to_string(),
        })
}

/// Parse a `REGIMEN` value; numeric columns may come back as `2.0` or `2.00`
pub fn parse_regime_id(raw: &str) -> Result<i32, DatabaseError> {
    let trimmed = raw.trim();
    let unexpected = || DatabaseError::UnexpectedValue {
        column: "REGIMEN".to_string(),
        value: trimmed.to_string(),
    };

    if let Ok(id) = trimmed.parse::<i32>() {
        return Ok(id);
    }
    match trimmed.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => {
            whole.parse::<i32>().map_err(|_| unexpected())
        }
        _ => Err(unexpected()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_birth_date_forms() {
        let expected = NaiveDate::from_ymd_opt(1980, 5, 17);
        assert_eq!(parse_birth_date("1980-05-17").unwrap(), expected);
        assert_eq!(parse_birth_date("1980-05-17 00:00:00.000").unwrap(), expected);
        assert_eq!(parse_birth_date("  ").unwrap(), None);
        assert!(parse_birth_date("17/05/1980").is_err());
    }

    #[test]
    fn test_parse_regime_id_forms() {
        assert_eq!(parse_regime_id("2").unwrap(), 2);
        assert_eq!(parse_regime_id(" 3 ").unwrap(), 3);
        assert_eq!(parse_regime_id("1.00").unwrap(), 1);
        assert!(parse_regime_id("1.5").is_err());
        assert!(parse_regime_id("abc").is_err());
    }
}
