//! CUIL (Código Único de Identificación Laboral) parsing
//!
//! A CUIL is accepted when, after trimming surrounding whitespace, it is
//! exactly eleven ASCII digits. The check digit is inspected but never used
//! to reject input; the database is the authority on which numbers exist.

use crate::errors::ValidationError;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Number of digits in a CUIL
pub const CUIL_LENGTH: usize = 11;

const CHECK_WEIGHTS: [u32; 10] = [5, 4, 3, 2, 7, 6, 5, 4, 3, 2];

fn cuil_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{11}$").expect("CUIL pattern is a valid regex"))
}

/// A validated CUIL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cuil(String);

impl Cuil {
    /// Parse operator input into a CUIL
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if cuil_pattern().is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ValidationError::InvalidCuil {
                value: trimmed.to_string(),
            })
        }
    }

    /// The eleven digits, as sent to the stored procedures
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Dashed form, e.g. `20-12345678-6`
    #[must_use]
    pub fn formatted(&self) -> String {
        format!("{}-{}-{}", &self.0[..2], &self.0[2..10], &self.0[10..])
    }

    /// Whether the last digit matches the mod-11 check digit of the first ten
    #[must_use]
    pub fn has_consistent_check_digit(&self) -> bool {
        let digits: Vec<u32> = self.0.chars().filter_map(|c| c.to_digit(10)).collect();
        let sum: u32 = digits
            .iter()
            .zip(CHECK_WEIGHTS.iter())
            .map(|(digit, weight)| digit * weight)
            .sum();

        match 11 - (sum % 11) {
            11 => digits[10] == 0,
            // Issuers switch the prefix instead of emitting 10
            10 => false,
            expected => digits[10] == expected,
        }
    }
}

impl FromStr for Cuil {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Cuil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Cuil {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_eleven_digits() {
        let cuil = Cuil::parse("20123456786").unwrap();
        assert_eq!(cuil.as_str(), "20123456786");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        let cuil = Cuil::parse("  20123456786\n").unwrap();
        assert_eq!(cuil.as_str(), "20123456786");
    }

    #[test]
    fn test_rejects_wrong_lengths() {
        for input in ["", "2012345678", "201234567860", "1"] {
            assert!(Cuil::parse(input).is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn test_rejects_non_digits() {
        for input in ["20-12345678-6", "2012345678a", "20 12345678", "٢٠١٢٣٤٥٦٧٨٦", "+2012345678"] {
            assert!(Cuil::parse(input).is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn test_error_reports_offending_value() {
        let err = Cuil::parse("123").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidCuil {
                value: "123".to_string()
            }
        );
    }

    #[test]
    fn test_formatted() {
        let cuil = Cuil::parse("20123456786").unwrap();
        assert_eq!(cuil.formatted(), "20-12345678-6");
        assert_eq!(cuil.to_string(), "20123456786");
    }

    #[test]
    fn test_check_digit() {
        assert!(Cuil::parse("20123456786").unwrap().has_consistent_check_digit());
        assert!(!Cuil::parse("20123456780").unwrap().has_consistent_check_digit());
    }
}
