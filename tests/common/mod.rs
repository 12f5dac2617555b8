//! Common test utilities and fixtures

#![allow(dead_code)]

use futures_position_sizer::{
    CalculatorSettings, ContractTable, InputEvent, InputField, Session,
};
use rust_decimal::Decimal;

pub const ES: &str = "ES (E-mini S&P 500)";
pub const NQ: &str = "NQ (E-mini Nasdaq 100)";
pub const CL: &str = "CL (Crude Oil)";
pub const ZN: &str = "ZN (10-Year T-Note)";

/// A session over the built-in contract table with default settings
pub fn new_session() -> Session {
    Session::new(ContractTable::builtin(), CalculatorSettings::default())
}

/// A session with a contract selected and all four inputs filled in
pub fn filled_session(
    contract: &str,
    entry: Decimal,
    stop: Decimal,
    account: Decimal,
    risk: Decimal,
) -> Session {
    let mut session = new_session();
    session.apply(InputEvent::SelectContract(contract.to_string()));
    session.apply(InputEvent::SetValue(InputField::EntryPrice, entry));
    session.apply(InputEvent::SetValue(InputField::StopPrice, stop));
    session.apply(InputEvent::SetValue(InputField::AccountSize, account));
    session.apply(InputEvent::SetValue(InputField::RiskPercent, risk));
    session
}
