use super::report_error;
use crate::connection::Connector;
use crate::cuil::Cuil;
use crate::regime::Regime;
use crate::service::RegimeService;
use crate::store::RegimeStore;
use anyhow::Result;
use serde_json::json;
use std::io::Write;

/// Handle the set command: update, then print the refreshed record
///
/// A refresh failure after the change committed is reported but does not
/// fail the command.
pub fn handle_set<C>(
    service: &RegimeService<C>,
    cuil: &Cuil,
    regime: Regime,
    json: bool,
    out: &mut impl Write,
) -> Result<()>
where
    C: Connector,
    C::Connection: RegimeStore,
{
    let outcome = service.update_cuil(cuil, regime)?;

    if json {
        let updated = json!({ "id": outcome.regime.id(), "name": outcome.regime.name() });
        let body = match &outcome.refreshed {
            Ok(view) => json!({ "cuil": outcome.cuil, "updated": updated, "view": view }),
            Err(e) => {
                e.log();
                json!({
                    "cuil": outcome.cuil,
                    "updated": updated,
                    "view": null,
                    "refresh_error": e.user_message(),
                })
            }
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
        return Ok(());
    }

    writeln!(out, "✅ Regime updated to {}", outcome.regime)?;
    match &outcome.refreshed {
        Ok(view) => writeln!(out, "{view}")?,
        Err(e) => report_error(e, out)?,
    }
    Ok(())
}
