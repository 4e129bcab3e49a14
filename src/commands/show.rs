use crate::connection::Connector;
use crate::cuil::Cuil;
use crate::service::RegimeService;
use crate::store::RegimeStore;
use anyhow::Result;
use std::io::Write;

/// Handle the show command
pub fn handle_show<C>(
    service: &RegimeService<C>,
    cuil: &Cuil,
    json: bool,
    out: &mut impl Write,
) -> Result<()>
where
    C: Connector,
    C::Connection: RegimeStore,
{
    let view = service.lookup_cuil(cuil)?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&view)?)?;
    } else {
        writeln!(out, "🔍 {view}")?;
    }
    Ok(())
}
