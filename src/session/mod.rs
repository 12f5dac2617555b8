//! Calculator session
//!
//! A [`Session`] owns one user's form state. Every change goes through the
//! pure [`on_input_change`] update, which also re-aligns both prices to the
//! selected contract's tick grid, so a session never holds an off-grid price.
//!
//! ```text
//!  InputEvent ──► on_input_change ──► synchronize ──► CalculatorState
//!                                                          │
//!  Calculate ─────────────────────────────────────► sizing::calculate
//!                                                          │
//!                                                          ▼
//!                                                       Outcome
//! ```

mod state;

pub use state::{
    on_input_change, parse_input, synchronize, CalculatorState, InputEvent, MAX_RISK_PERCENT,
};

use tracing::{debug, info, warn};

use crate::common::errors::{CalcError, InputField, Result};
use crate::config::types::CalculatorSettings;
use crate::contracts::{ContractSpec, ContractTable};
use crate::sizing::calculator::{calculate, PositionSize};

/// What the output region shows after a calculation
#[derive(Debug)]
pub enum Outcome {
    /// Sizing succeeded; the result may still carry an advisory
    Sized(PositionSize),
    /// A validation failure shown as a warning
    Rejected(CalcError),
}

impl Outcome {
    pub fn position(&self) -> Option<&PositionSize> {
        match self {
            Outcome::Sized(size) => Some(size),
            Outcome::Rejected(_) => None,
        }
    }

    /// Process exit status for one-shot use: an advisory still sized, a warning did not
    pub fn exit_status(&self) -> u8 {
        match self {
            Outcome::Sized(_) => 0,
            Outcome::Rejected(_) => 1,
        }
    }
}

/// One interactive calculator session
#[derive(Debug)]
pub struct Session {
    table: ContractTable,
    settings: CalculatorSettings,
    state: CalculatorState,
    outcome: Option<Outcome>,
}

impl Session {
    pub fn new(table: ContractTable, settings: CalculatorSettings) -> Self {
        let state = CalculatorState::new(&table, &settings);
        Self {
            table,
            settings,
            state,
            outcome: None,
        }
    }

    pub fn table(&self) -> &ContractTable {
        &self.table
    }

    pub fn settings(&self) -> &CalculatorSettings {
        &self.settings
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn contract(&self) -> &ContractSpec {
        &self.state.selected_contract
    }

    /// Result of the last calculation, cleared by any input change
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Apply an input event
    pub fn apply(&mut self, event: InputEvent) {
        match &event {
            InputEvent::SelectContract(name) => info!(contract = %name, "Contract selected"),
            InputEvent::Reset => info!("Session reset"),
            other => debug!(event = ?other, "Input changed"),
        }

        let next = on_input_change(&self.table, &self.settings, &self.state, event);
        if next.entry_price != self.state.entry_price || next.stop_price != self.state.stop_price {
            debug!(
                entry_price = %next.entry_price,
                stop_price = %next.stop_price,
                "Prices aligned to tick grid"
            );
        }

        self.state = next;
        self.outcome = None;
    }

    /// Select a contract by position in the table
    ///
    /// Out-of-range indices are ignored.
    pub fn select_index(&mut self, index: usize) {
        if let Some(name) = self.table.get(index).map(|spec| spec.name.clone()) {
            if name != self.state.selected_contract.name {
                self.apply(InputEvent::SelectContract(name));
            }
        }
    }

    /// Position of the selected contract in the table
    pub fn selected_index(&self) -> usize {
        self.table
            .position(&self.state.selected_contract.name)
            .unwrap_or(0)
    }

    /// Parse `text` and set `field` to it
    pub fn set_text(&mut self, field: InputField, text: &str) -> Result<()> {
        let value = parse_input(field, text)?;
        self.apply(InputEvent::SetValue(field, value));
        Ok(())
    }

    pub fn reset(&mut self) {
        self.apply(InputEvent::Reset);
    }

    /// Run the position size calculation on the current form values
    pub fn calculate(&mut self) -> &Outcome {
        if synchronize(&mut self.state) {
            debug!("Prices re-aligned before calculating");
        }

        let outcome = match calculate(&self.state.selected_contract, &self.state.inputs()) {
            Ok(size) => {
                if let Some(advisory) = size.advisory {
                    warn!(
                        contract = %size.contract,
                        raw_position_size = %size.raw_position_size,
                        ?advisory,
                        "Position rounds down to zero contracts"
                    );
                } else {
                    info!(
                        contract = %size.contract,
                        recommended_size = size.recommended_size,
                        "Position size calculated"
                    );
                }
                Outcome::Sized(size)
            }
            Err(err) => {
                warn!(error = %err, "Calculation rejected");
                Outcome::Rejected(err)
            }
        };

        self.outcome.insert(outcome)
    }
}
