/// Show command functionality
pub mod show;
/// Set command functionality
pub mod set;
/// Regimes command functionality
pub mod regimes;
/// Drivers command functionality
pub mod drivers;
/// Config command functionality
pub mod effective_config;
/// Interactive prompt functionality
pub mod interactive;

use crate::errors::RegimeError;
use std::io::{self, Write};

/// Log a failed operation and tell the operator what went wrong
pub fn report_error(error: &RegimeError, out: &mut impl Write) -> io::Result<()> {
    error.log();
    writeln!(out, "❌ {}", error.user_message())
}
