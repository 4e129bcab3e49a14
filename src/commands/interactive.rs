//! Prompt loop standing in for the lookup/update form
//!
//! The operator types a CUIL to look it up, then `set <regime>` to change the
//! regime of the CUIL currently shown. Failures are reported and the loop
//! carries on; only `quit` or end of input ends it.

use super::regimes::handle_regimes;
use super::report_error;
use crate::connection::Connector;
use crate::cuil::Cuil;
use crate::errors::RegimeError;
use crate::regime::Regime;
use crate::service::RegimeService;
use crate::store::RegimeStore;
use std::io::{self, BufRead, Write};
use tracing::debug;

const PROMPT: &str = "regime> ";

const HELP: &str = "\
Commands:
  <CUIL>                 look up a person (11 digits)
  set <REGIME>           change the regime of the CUIL shown
  set <CUIL> <REGIME>    change the regime of another CUIL
  regimes                list regimes
  help                   show this text
  quit                   leave";

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Lookup(&'a str),
    Set {
        cuil: Option<&'a str>,
        regime: &'a str,
    },
    Regimes,
    Help,
    Quit,
    Empty,
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    match line.split_whitespace().next() {
        None => Input::Empty,
        Some(word) => match word.to_lowercase().as_str() {
            "quit" | "exit" | "q" => Input::Quit,
            "help" | "?" => Input::Help,
            "regimes" => Input::Regimes,
            "set" => {
                let rest = line[word.len()..].trim();
                match rest.split_once(char::is_whitespace) {
                    Some((cuil, regime)) if cuil.chars().all(|c| c.is_ascii_digit()) => {
                        Input::Set {
                            cuil: Some(cuil),
                            regime: regime.trim(),
                        }
                    }
                    _ => Input::Set {
                        cuil: None,
                        regime: rest,
                    },
                }
            }
            _ => Input::Lookup(line),
        },
    }
}

/// Run the prompt loop until `quit` or end of input
pub fn handle_interactive<C>(
    service: &RegimeService<C>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<()>
where
    C: Connector,
    C::Connection: RegimeStore,
{
    writeln!(out, "📋 Regime manager ({})", service.settings().target)?;
    writeln!(out, "{HELP}")?;

    let mut current: Option<Cuil> = None;
    let mut line = String::new();

    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        match parse_input(&line) {
            Input::Empty => {}
            Input::Quit => break,
            Input::Help => writeln!(out, "{HELP}")?,
            Input::Regimes => handle_regimes(out)?,
            Input::Lookup(raw) => {
                debug!("Lookup requested for '{}'", raw);
                match service.lookup(raw) {
                    Ok(view) => {
                        writeln!(out, "{view}")?;
                        current = Some(view.cuil);
                    }
                    Err(e) => {
                        current = if e.is_input_error() {
                            None
                        } else {
                            Cuil::parse(raw).ok()
                        };
                        report_error(&e, out)?;
                    }
                }
            }
            Input::Set { cuil, regime } => {
                let cuil = match cuil {
                    Some(raw) => match Cuil::parse(raw) {
                        Ok(cuil) => Some(cuil),
                        Err(e) => {
                            report_error(&RegimeError::validation(e, "update"), out)?;
                            continue;
                        }
                    },
                    None => current.clone(),
                };
                let Some(cuil) = cuil else {
                    writeln!(out, "❌ Look up a CUIL first")?;
                    continue;
                };

                let regime = match regime.parse::<Regime>() {
                    Ok(regime) => regime,
                    Err(e) => {
                        report_error(&RegimeError::validation(e, "update"), out)?;
                        continue;
                    }
                };

                match service.update_cuil(&cuil, regime) {
                    Ok(outcome) => {
                        writeln!(out, "✅ Regime updated to {}", outcome.regime)?;
                        match outcome.refreshed {
                            Ok(view) => writeln!(out, "{view}")?,
                            Err(e) => report_error(&e, out)?,
                        }
                        current = Some(outcome.cuil);
                    }
                    Err(e) => report_error(&e, out)?,
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("  \n"), Input::Empty);
        assert_eq!(parse_input("QUIT"), Input::Quit);
        assert_eq!(parse_input("?"), Input::Help);
        assert_eq!(parse_input("regimes"), Input::Regimes);
        assert_eq!(parse_input("20123456786\n"), Input::Lookup("20123456786"));
        assert_eq!(
            parse_input("set policial"),
            Input::Set {
                cuil: None,
                regime: "policial"
            }
        );
        assert_eq!(
            parse_input("set régimen común"),
            Input::Set {
                cuil: None,
                regime: "régimen común"
            }
        );
        assert_eq!(
            parse_input("set 20123456786 regimen comun"),
            Input::Set {
                cuil: Some("20123456786"),
                regime: "regimen comun"
            }
        );
        assert_eq!(
            parse_input("set 2"),
            Input::Set {
                cuil: None,
                regime: "2"
            }
        );
    }
}
