//! Regime catalog

use crate::errors::ValidationError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Label shown for a stored regime id outside the catalog
pub const UNKNOWN_REGIME: &str = "Desconocido";

/// Categorical classification assigned to a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Regime {
    /// Teaching staff
    Teaching,
    /// Common regime
    Common,
    /// Police regime
    Police,
}

impl Regime {
    /// Every regime, in id order
    pub const ALL: [Self; 3] = [Self::Teaching, Self::Common, Self::Police];

    /// Numeric id stored in the database
    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::Teaching => 1,
            Self::Common => 2,
            Self::Police => 3,
        }
    }

    /// Display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Teaching => "Docentes",
            Self::Common => "Régimen Común",
            Self::Police => "Régimen Policial",
        }
    }

    /// Look a regime up by its database id
    #[must_use]
    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|regime| regime.id() == id)
    }

    /// Name for any stored id, falling back to [`UNKNOWN_REGIME`]
    #[must_use]
    pub fn name_for_id(id: i32) -> &'static str {
        Self::from_id(id).map_or(UNKNOWN_REGIME, Self::name)
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Teaching => &["docentes", "docente", "teaching"],
            Self::Common => &["regimen comun", "comun", "common"],
            Self::Police => &["regimen policial", "policial", "police"],
        }
    }
}

fn fold(input: &str) -> String {
    input
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            '_' | '-' => ' ',
            other => other,
        })
        .collect()
}

impl FromStr for Regime {
    type Err = ValidationError;

    /// Accepts a numeric id or a name, case-insensitive, accents optional
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ValidationError::UnknownRegime {
            value: s.trim().to_string(),
        };

        if let Ok(id) = s.trim().parse::<i32>() {
            return Self::from_id(id).ok_or_else(unknown);
        }

        let folded = fold(s);
        Self::ALL
            .into_iter()
            .find(|regime| regime.aliases().contains(&folded.as_str()))
            .ok_or_else(unknown)
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} – {}", self.id(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for regime in Regime::ALL {
            assert_eq!(Regime::from_id(regime.id()), Some(regime));
        }
        assert_eq!(Regime::from_id(0), None);
        assert_eq!(Regime::from_id(4), None);
    }

    #[test]
    fn test_unknown_id_name() {
        assert_eq!(Regime::name_for_id(2), "Régimen Común");
        assert_eq!(Regime::name_for_id(9), UNKNOWN_REGIME);
    }

    #[test]
    fn test_parse_by_id_and_name() {
        assert_eq!("1".parse::<Regime>().unwrap(), Regime::Teaching);
        assert_eq!(" 3 ".parse::<Regime>().unwrap(), Regime::Police);
        assert_eq!("Docentes".parse::<Regime>().unwrap(), Regime::Teaching);
        assert_eq!("régimen común".parse::<Regime>().unwrap(), Regime::Common);
        assert_eq!("COMUN".parse::<Regime>().unwrap(), Regime::Common);
        assert_eq!("regimen-policial".parse::<Regime>().unwrap(), Regime::Police);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("4".parse::<Regime>().is_err());
        assert!("military".parse::<Regime>().is_err());
        assert!("".parse::<Regime>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Regime::Police.to_string(), "3 – Régimen Policial");
    }
}
