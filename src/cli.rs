use crate::config::Overrides;
use crate::cuil::Cuil;
use crate::regime::Regime;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI interface
#[derive(Parser)]
#[command(name = "regime")]
#[command(version = crate::VERSION)]
#[command(about = "Look up a person by CUIL and change their regime")]
#[command(
    long_about = "Look up a person by CUIL and change their regime through the SQL Server \
                  stored procedures, trying each configured ODBC driver in turn"
)]
pub struct Cli {
    /// Connection options
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// The command to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options that override the configuration file
#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Configuration file (defaults to ./regime.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// SQL Server host
    #[arg(long, global = true, value_name = "HOST")]
    pub server: Option<String>,
    /// Database name
    #[arg(long, global = true, value_name = "NAME")]
    pub database: Option<String>,
    /// ODBC driver to try; repeat to build a fallback list
    #[arg(long = "driver", global = true, value_name = "NAME")]
    pub drivers: Vec<String>,
    /// Login timeout per driver, in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show name, birth date and current regime for a CUIL
    Show {
        /// CUIL, 11 digits
        cuil: Cuil,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Change the regime for a CUIL
    Set {
        /// CUIL, 11 digits
        cuil: Cuil,
        /// New regime: 1, 2, 3 or docentes, comun, policial
        regime: Regime,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the regime catalog
    Regimes,
    /// Show candidate and installed ODBC drivers
    Drivers,
    /// Print the effective configuration
    Config,
    /// Prompt for CUILs and regime changes until quit
    Interactive,
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

impl ConnectionArgs {
    /// Split into the config path and the overrides
    #[must_use]
    pub fn into_parts(self) -> (Option<PathBuf>, Overrides) {
        (
            self.config,
            Overrides {
                server: self.server,
                database: self.database,
                drivers: self.drivers,
                login_timeout_secs: self.timeout,
            },
        )
    }
}
