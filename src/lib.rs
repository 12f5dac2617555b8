//! Futures Position Sizer Library
//!
//! Converts an entry price, a stop price, an account size and a risk
//! percentage into a recommended futures position size, using per-contract
//! tick metadata.

pub mod common;
pub mod config;
pub mod contracts;
pub mod report;
pub mod session;
pub mod sizing;
pub mod tui;

// Re-export commonly used types
pub use common::errors::{CalcError, InputField, Result};
pub use config::types::{AppConfig, CalculatorSettings};
pub use contracts::{ContractSpec, ContractTable};
pub use session::{on_input_change, CalculatorState, InputEvent, Outcome, Session};
pub use sizing::{calculate, round_to_tick, Advisory, PositionInputs, PositionSize};
