use anyhow::Context;
use regime_manager::cli::{Cli, Commands};
use regime_manager::commands::{
    drivers, effective_config, interactive, regimes, report_error, set, show,
};
use regime_manager::config::Config;
use regime_manager::validators::ConfigValidator;
use regime_manager::{Connector, RegimeError, RegimeService, RegimeStore};
use std::io::{self, Write};
use std::process;
use tracing_subscriber::EnvFilter;

// Allow println in main CLI binary
#[allow(clippy::disallowed_methods)]
fn main() {
    init_logging();

    let cli = Cli::parse();
    tracing::info!("regime CLI initialized");

    if let Err(e) = run(cli) {
        match e.downcast_ref::<RegimeError>() {
            Some(regime_error) => {
                let _ = report_error(regime_error, &mut io::stderr());
            }
            None => eprintln!("❌ Error: {e:#}"),
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let (config_path, overrides) = cli.connection.into_parts();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let Some(command) = cli.command else {
        writeln!(out, "regime - Use --help for available commands")?;
        return Ok(());
    };

    if matches!(command, Commands::Regimes) {
        return Ok(regimes::handle_regimes(&mut out)?);
    }

    let config = Config::load(config_path.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(overrides);

    if matches!(command, Commands::Config) {
        return effective_config::handle_config(&config, &mut out);
    }

    let validation = ConfigValidator::new().validate(&config);
    if let Some(error) = validation.first_error() {
        return Err(RegimeError::config(error.clone(), "configure").into());
    }

    run_with_backend(command, &config, &mut out)
}

#[cfg(feature = "odbc")]
fn run_with_backend(
    command: Commands,
    config: &Config,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let connector = regime_manager::database::OdbcConnector::new()?;
    dispatch(command, connector, config, out)
}

#[cfg(not(feature = "odbc"))]
fn run_with_backend(
    _command: Commands,
    _config: &Config,
    _out: &mut impl Write,
) -> anyhow::Result<()> {
    anyhow::bail!("this build has no database backend; rebuild with `--features odbc`")
}

#[cfg_attr(not(feature = "odbc"), allow(dead_code))]
fn dispatch<C>(
    command: Commands,
    connector: C,
    config: &Config,
    out: &mut impl Write,
) -> anyhow::Result<()>
where
    C: Connector,
    C::Connection: RegimeStore,
{
    let service = RegimeService::from_config(connector, config)?;

    match command {
        Commands::Show { cuil, json } => show::handle_show(&service, &cuil, json, out),
        Commands::Set { cuil, regime, json } => set::handle_set(&service, &cuil, regime, json, out),
        Commands::Drivers => Ok(drivers::handle_drivers(
            service.connector(),
            &service.settings().candidates,
            out,
        )?),
        Commands::Interactive => {
            let stdin = io::stdin();
            Ok(interactive::handle_interactive(&service, &mut stdin.lock(), out)?)
        }
        Commands::Regimes | Commands::Config => Ok(()),
    }
}

/// Initialize logging based on environment variables
fn init_logging() {
    // Default to INFO level, can be overridden by RUST_LOG environment variable
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("regime_manager=info,regime=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}
