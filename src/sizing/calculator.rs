use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::debug;

use crate::common::errors::{CalcError, InputField, Result};
use crate::contracts::ContractSpec;
use crate::sizing::tick::format_fixed;

/// Decimal places for currency, tick distance and raw size in the output
pub const RESULT_DISPLAY_DP: u32 = 2;

/// Raw inputs to a position size calculation
///
/// Prices are expected to be tick-aligned already; the session takes care of
/// that before calling [`calculate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionInputs {
    pub entry_price: Decimal,
    pub stop_price: Decimal,
    pub account_size: Decimal,
    /// Percentage of the account put at risk (1.0 = 1%)
    pub risk_percent: Decimal,
}

impl PositionInputs {
    /// Fields that are zero, in form order
    pub fn missing_fields(&self) -> Vec<InputField> {
        [
            (InputField::EntryPrice, self.entry_price),
            (InputField::StopPrice, self.stop_price),
            (InputField::AccountSize, self.account_size),
            (InputField::RiskPercent, self.risk_percent),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_zero())
        .map(|(field, _)| field)
        .collect()
    }
}

/// Non-fatal notes attached to a successful calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    /// The raw size rounds down to zero contracts
    SubMinimumPosition,
}

impl Advisory {
    pub fn message(&self) -> &'static str {
        match self {
            Advisory::SubMinimumPosition => {
                "Your stop is too wide relative to your risk amount. No position can be \
                 taken with this setup. Consider trading micros if they are available."
            }
        }
    }
}

/// Result of a position size calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionSize {
    pub contract: String,
    pub entry_price: Decimal,
    pub stop_price: Decimal,
    /// Dollars at risk on the trade
    pub risk_per_trade: Decimal,
    /// Distance from entry to stop, in ticks
    pub stop_distance_ticks: Decimal,
    /// Unrounded number of contracts
    pub raw_position_size: Decimal,
    /// Whole contracts, rounded down
    pub recommended_size: u64,
    pub advisory: Option<Advisory>,
    pub computed_at: DateTime<Utc>,
}

impl PositionSize {
    pub fn risk_per_trade_display(&self) -> String {
        format_fixed(self.risk_per_trade, RESULT_DISPLAY_DP)
    }

    pub fn stop_distance_display(&self) -> String {
        format_fixed(self.stop_distance_ticks, RESULT_DISPLAY_DP)
    }

    pub fn raw_position_size_display(&self) -> String {
        format_fixed(self.raw_position_size, RESULT_DISPLAY_DP)
    }

    pub fn is_tradeable(&self) -> bool {
        self.recommended_size >= 1
    }
}

/// Size a position so that a stop-out loses `risk_percent` of the account
///
/// ```text
/// risk_per_trade      = risk_percent / 100 * account_size
/// stop_distance_ticks = |entry - stop| / tick_size
/// raw_position_size   = risk_per_trade / (tick_value * stop_distance_ticks)
/// recommended_size    = floor(raw_position_size)
/// ```
///
/// # Errors
/// - [`CalcError::IncompleteInput`] if any input is zero
/// - [`CalcError::ZeroStopDistance`] if entry equals stop
/// - [`CalcError::Overflow`] if an intermediate value leaves the decimal range
pub fn calculate(spec: &ContractSpec, inputs: &PositionInputs) -> Result<PositionSize> {
    let missing = inputs.missing_fields();
    if !missing.is_empty() {
        return Err(CalcError::IncompleteInput { missing });
    }

    if inputs.entry_price == inputs.stop_price {
        return Err(CalcError::ZeroStopDistance);
    }

    let risk_per_trade = (inputs.risk_percent / dec!(100))
        .checked_mul(inputs.account_size)
        .ok_or(CalcError::Overflow("risk per trade"))?;

    let stop_distance_ticks = inputs
        .entry_price
        .checked_sub(inputs.stop_price)
        .and_then(|distance| distance.abs().checked_div(spec.tick_size))
        .ok_or(CalcError::Overflow("stop distance"))?;

    let raw_position_size = spec
        .tick_value
        .checked_mul(stop_distance_ticks)
        .and_then(|risk_per_contract| risk_per_trade.checked_div(risk_per_contract))
        .ok_or(CalcError::Overflow("position size"))?;

    // Negative account or risk values never reach here from a session; treat
    // them as zero contracts rather than failing.
    let whole_contracts = raw_position_size.floor();
    let recommended_size = if whole_contracts.is_sign_negative() {
        0
    } else {
        whole_contracts
            .to_u64()
            .ok_or(CalcError::Overflow("recommended size"))?
    };

    let advisory = (recommended_size < 1).then_some(Advisory::SubMinimumPosition);

    debug!(
        contract = %spec.name,
        %risk_per_trade,
        %stop_distance_ticks,
        %raw_position_size,
        recommended_size,
        "Position size calculated"
    );

    Ok(PositionSize {
        contract: spec.name.clone(),
        entry_price: inputs.entry_price,
        stop_price: inputs.stop_price,
        risk_per_trade,
        stop_distance_ticks,
        raw_position_size,
        recommended_size,
        advisory,
        computed_at: Utc::now(),
    })
}
