use crate::regime::Regime;
use std::io::{self, Write};

/// Handle the regimes command
pub fn handle_regimes(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "📋 Regimes")?;
    for regime in Regime::ALL {
        writeln!(out, "   {regime}")?;
    }
    Ok(())
}
