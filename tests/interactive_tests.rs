//! The prompt loop keeps running through bad input and database failures

mod common;

use common::{service_with, FakeConnector, KNOWN_CUIL};
use regime_manager::commands::interactive::handle_interactive;
use std::io::Cursor;

fn run(connector: FakeConnector, script: &str) -> String {
    let service = service_with(connector, &["SQL Server"]);
    let mut input = Cursor::new(script.as_bytes().to_vec());
    let mut out = Vec::new();
    handle_interactive(&service, &mut input, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn seeded() -> FakeConnector {
    FakeConnector::new(&["SQL Server"]).with_person(
        KNOWN_CUIL,
        "PEREZ JUAN",
        Some((1980, 5, 17)),
        2,
    )
}

#[test]
fn test_lookup_then_set() {
    let connector = seeded();
    let output = run(connector.clone(), &format!("{KNOWN_CUIL}\nset policial\nquit\n"));

    assert!(output.contains("Name: PEREZ JUAN"));
    assert!(output.contains("Current regime: 2 – Régimen Común"));
    assert!(output.contains("✅ Regime updated to 3 – Régimen Policial"));
    assert!(output.contains("Current regime: 3 – Régimen Policial"));
    assert_eq!(connector.stored_regime(KNOWN_CUIL), Some(3));
    assert_eq!(connector.opened(), connector.released());
}

#[test]
fn test_invalid_input_is_reported_and_loop_continues() {
    let output = run(seeded(), &format!("12345\n{KNOWN_CUIL}\n"));

    assert!(output.contains("❌ Invalid input: CUIL must be exactly 11 numeric digits"));
    assert!(output.contains("Name: PEREZ JUAN"));
}

#[test]
fn test_set_requires_a_cuil() {
    let connector = seeded();
    let output = run(connector.clone(), "set 1\n12345\nset 1\nquit\n");

    assert_eq!(output.matches("❌ Look up a CUIL first").count(), 2);
    assert_eq!(connector.stored_regime(KNOWN_CUIL), Some(2));
}

#[test]
fn test_set_with_explicit_cuil_and_unknown_regime() {
    let connector = seeded();
    let output = run(
        connector.clone(),
        &format!("set {KNOWN_CUIL} militar\nset {KNOWN_CUIL} docentes\n"),
    );

    assert!(output.contains("Unknown regime 'militar'"));
    assert!(output.contains("✅ Regime updated to 1 – Docentes"));
    assert_eq!(connector.stored_regime(KNOWN_CUIL), Some(1));
}

#[test]
fn test_database_failure_does_not_end_the_session() {
    let connector = seeded().failing("Gestion.dbo.Anto_ObtenerPersonaPorCUIL");
    let output = run(connector.clone(), &format!("{KNOWN_CUIL}\nregimes\nquit\n"));

    assert!(output.contains("❌ Could not fetch the data."));
    assert!(output.contains("2 – Régimen Común"));
    assert_eq!((connector.opened(), connector.released()), (1, 1));
}

#[test]
fn test_committed_update_is_confirmed_when_refresh_fails() {
    let connector = seeded().failing("Gestion.dbo.anto_regimenactual");
    let output = run(
        connector.clone(),
        &format!("set {KNOWN_CUIL} policial\nset docentes\nquit\n"),
    );

    assert!(output.contains("✅ Regime updated to 3 – Régimen Policial"));
    assert!(output.contains("✅ Regime updated to 1 – Docentes"));
    assert_eq!(output.matches("❌ Could not fetch the data.").count(), 2);
    assert!(!output.contains("Look up a CUIL first"));
    assert_eq!(connector.stored_regime(KNOWN_CUIL), Some(1));
}

#[test]
fn test_unavailable_server_is_reported() {
    let output = run(FakeConnector::new(&[]), &format!("{KNOWN_CUIL}\n"));
    assert!(output.contains("❌ Could not establish a connection to SQL Server"));
}
