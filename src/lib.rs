//! `regime-manager` - look up a person by CUIL and change their regime
//!
//! Connections are opened by walking an ordered list of ODBC driver names
//! until one works ([`acquirer`]). Every lookup or update owns its own
//! connection and releases it before returning ([`service`]).

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs,
    rust_2018_idioms
)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

/// Connection acquisition with driver fallback
pub mod acquirer;
/// Command-line interface definition
pub mod cli;
/// Command handlers
pub mod commands;
/// Configuration management
pub mod config;
pub mod connection;
pub mod cuil;
#[cfg(feature = "odbc")]
pub mod database;
pub mod errors;
pub mod regime;
pub mod service;
pub mod store;
pub mod validators;
pub mod view;

pub use acquirer::ConnectionAcquirer;
pub use config::Config;
pub use connection::{ConnectionTarget, Connector, DriverCandidates};
pub use cuil::Cuil;
pub use errors::{RegimeError, RegimeResult};
pub use regime::Regime;
pub use service::{ConnectionSettings, RegimeService, UpdateOutcome};
pub use store::{PersonRecord, RegimeStore};
pub use view::PersonView;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }
}
