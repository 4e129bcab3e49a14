use crate::connection::{Connector, DriverCandidates};
use std::io::{self, Write};
use tracing::warn;

/// Handle the drivers command
///
/// Candidates that are not installed are flagged; they will always fail.
pub fn handle_drivers<C: Connector>(
    connector: &C,
    candidates: &DriverCandidates,
    out: &mut impl Write,
) -> io::Result<()> {
    let installed = match connector.installed_drivers() {
        Ok(installed) => Some(installed),
        Err(e) => {
            warn!("Could not list installed drivers: {}", e);
            None
        }
    };

    writeln!(out, "🔌 Candidate drivers (tried in order)")?;
    for (index, driver) in candidates.iter().enumerate() {
        let marker = match &installed {
            Some(list) if list.iter().any(|d| d == driver) => "✅",
            Some(_) => "❌",
            None => "❔",
        };
        writeln!(out, "   {}. {marker} {driver}", index + 1)?;
    }

    writeln!(out)?;
    match installed {
        Some(list) if list.is_empty() => writeln!(out, "No ODBC drivers installed")?,
        Some(list) => {
            writeln!(out, "🧩 Installed drivers")?;
            for driver in list {
                writeln!(out, "   - {driver}")?;
            }
        }
        None => writeln!(out, "Installed drivers could not be listed")?,
    }
    Ok(())
}
