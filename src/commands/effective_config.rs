use crate::config::Config;
use crate::validators::ConfigValidator;
use anyhow::Result;
use std::io::Write;

/// Handle the config command: print the merged configuration and any findings
pub fn handle_config(config: &Config, out: &mut impl Write) -> Result<()> {
    let result = ConfigValidator::new().validate(config);

    writeln!(out, "{}", config.to_toml()?)?;
    for warning in &result.warnings {
        writeln!(out, "⚠️  {}: {}", warning.field, warning.message)?;
    }
    for error in &result.errors {
        writeln!(out, "❌ {error}")?;
    }
    if result.is_valid {
        writeln!(out, "✅ Configuration is valid")?;
    }
    Ok(())
}
