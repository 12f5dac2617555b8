use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::common::errors::{CalcError, InputField, Result};
use crate::config::types::CalculatorSettings;
use crate::contracts::{ContractSpec, ContractTable};
use crate::sizing::calculator::PositionInputs;
use crate::sizing::tick::{round_to_tick, step_by_ticks};

/// Upper bound of the risk percentage field
pub const MAX_RISK_PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Form values for one calculator session
///
/// `entry_price` and `stop_price` are kept on the selected contract's tick
/// grid by [`synchronize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculatorState {
    pub selected_contract: ContractSpec,
    pub entry_price: Decimal,
    pub stop_price: Decimal,
    pub account_size: Decimal,
    pub risk_percent: Decimal,
}

impl CalculatorState {
    /// Fresh form: first contract, zero prices and account, default risk
    pub fn new(table: &ContractTable, settings: &CalculatorSettings) -> Self {
        Self {
            selected_contract: table.first().clone(),
            entry_price: Decimal::ZERO,
            stop_price: Decimal::ZERO,
            account_size: Decimal::ZERO,
            risk_percent: clamp_risk(settings.default_risk_percent),
        }
    }

    pub fn tick_size(&self) -> Decimal {
        self.selected_contract.tick_size
    }

    pub fn value(&self, field: InputField) -> Decimal {
        match field {
            InputField::EntryPrice => self.entry_price,
            InputField::StopPrice => self.stop_price,
            InputField::AccountSize => self.account_size,
            InputField::RiskPercent => self.risk_percent,
        }
    }

    pub fn inputs(&self) -> PositionInputs {
        PositionInputs {
            entry_price: self.entry_price,
            stop_price: self.stop_price,
            account_size: self.account_size,
            risk_percent: self.risk_percent,
        }
    }
}

/// A single change to the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Select a contract by display name
    SelectContract(String),
    /// Set a numeric field
    SetValue(InputField, Decimal),
    /// Move a numeric field by whole steps (ticks for prices)
    Step(InputField, i64),
    /// Back to defaults
    Reset,
}

/// Re-align both prices to the selected contract's tick grid
///
/// Returns true if either price moved. Aligned prices are left untouched, so
/// a second call always returns false.
pub fn synchronize(state: &mut CalculatorState) -> bool {
    let tick = state.tick_size();
    let entry = round_to_tick(state.entry_price, tick);
    let stop = round_to_tick(state.stop_price, tick);

    let changed = entry != state.entry_price || stop != state.stop_price;
    if changed {
        state.entry_price = entry;
        state.stop_price = stop;
    }
    changed
}

/// Apply one event to `state` and return the synchronized result
///
/// Account size is floored at zero and risk is clamped to 0–100, the same
/// way a bounded numeric field behaves.
///
/// # Panics
/// Panics if a [`InputEvent::SelectContract`] names a contract that is not in
/// `table`.
pub fn on_input_change(
    table: &ContractTable,
    settings: &CalculatorSettings,
    state: &CalculatorState,
    event: InputEvent,
) -> CalculatorState {
    let mut next = state.clone();

    match event {
        InputEvent::SelectContract(name) => {
            next.selected_contract = table.lookup(&name).clone();
        }
        InputEvent::SetValue(field, value) => set_value(&mut next, field, value),
        InputEvent::Step(field, steps) => {
            let value = match field {
                InputField::EntryPrice | InputField::StopPrice => {
                    step_by_ticks(next.value(field), next.tick_size(), steps)
                }
                InputField::AccountSize => step_value(next.account_size, settings.account_step, steps),
                InputField::RiskPercent => step_value(next.risk_percent, settings.risk_step, steps),
            };
            set_value(&mut next, field, value);
        }
        InputEvent::Reset => next = CalculatorState::new(table, settings),
    }

    synchronize(&mut next);
    next
}

/// Parse text typed into a numeric field
///
/// Blank text reads as zero. Thousands separators and a leading `$` are
/// accepted.
pub fn parse_input(field: InputField, text: &str) -> Result<Decimal> {
    let cleaned: String = text
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();

    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| CalcError::InvalidNumber {
            field,
            input: text.to_string(),
        })
}

fn set_value(state: &mut CalculatorState, field: InputField, value: Decimal) {
    match field {
        InputField::EntryPrice => state.entry_price = value,
        InputField::StopPrice => state.stop_price = value,
        InputField::AccountSize => state.account_size = value.max(Decimal::ZERO),
        InputField::RiskPercent => state.risk_percent = clamp_risk(value),
    }
}

fn step_value(value: Decimal, step: Decimal, steps: i64) -> Decimal {
    step.checked_mul(Decimal::from(steps))
        .and_then(|delta| value.checked_add(delta))
        .unwrap_or(value)
}

fn clamp_risk(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, MAX_RISK_PERCENT)
}
