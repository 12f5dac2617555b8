//! Configuration file loading

use std::io::Write;

use futures_position_sizer::config::{load_config, load_from_str};
use futures_position_sizer::{InputEvent, InputField, Session};
use rust_decimal_macros::dec;
use tempfile::NamedTempFile;

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let config = load_config(Some("does-not-exist.toml")).expect("defaults");
    assert_eq!(config.calculator.default_risk_percent, dec!(1.0));
    assert_eq!(config.contract_table().unwrap().len(), 40);
}

#[test]
fn test_file_settings_reach_the_session() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[calculator]
default_risk_percent = 0.5

[[contracts]]
name = "MES (Micro E-mini S&P 500)"
tick_size = 0.25
tick_value = 1.25
"#
    )
    .unwrap();

    let config = load_config(file.path().to_str()).expect("config loads");
    let table = config.contract_table().unwrap();
    let mut session = Session::new(table, config.calculator.clone());
    assert_eq!(session.state().risk_percent, dec!(0.5));

    // The ES setup that is too wide for one E-mini fits four micros.
    session.apply(InputEvent::SelectContract("MES (Micro E-mini S&P 500)".into()));
    session.apply(InputEvent::SetValue(InputField::EntryPrice, dec!(4500)));
    session.apply(InputEvent::SetValue(InputField::StopPrice, dec!(4495)));
    session.apply(InputEvent::SetValue(InputField::AccountSize, dec!(10000)));
    session.apply(InputEvent::SetValue(InputField::RiskPercent, dec!(1)));

    let size = session.calculate().position().cloned().expect("sized");
    assert_eq!(size.raw_position_size, dec!(4));
    assert_eq!(size.recommended_size, 4);
}

#[test]
fn test_example_config_is_valid() {
    let config = load_from_str(include_str!("../sizer.example.toml")).expect("example parses");
    let table = config.contract_table().unwrap();
    assert_eq!(table.len(), 42);
    assert!(table.find_symbol("MNQ").is_some());
}
