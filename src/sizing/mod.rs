//! Tick alignment and risk-based position sizing
//!
//! - [`tick`]: snapping prices to a contract's tick grid and formatting them
//! - [`calculator`]: turning entry, stop, account size and risk into contracts

pub mod calculator;
pub mod tick;

pub use calculator::{calculate, Advisory, PositionInputs, PositionSize};
pub use tick::{format_price, round_to_tick, tick_decimal_places};
