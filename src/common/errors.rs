//! Error types for the application

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type alias using our CalcError
pub type Result<T> = std::result::Result<T, CalcError>;

/// Numeric input fields of the calculator form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    EntryPrice,
    StopPrice,
    AccountSize,
    RiskPercent,
}

impl InputField {
    /// Label shown next to the field in the form
    pub fn label(&self) -> &'static str {
        match self {
            InputField::EntryPrice => "Entry Price",
            InputField::StopPrice => "Stop Price",
            InputField::AccountSize => "Account Size (AUM in $)",
            InputField::RiskPercent => "Risk per Trade (%)",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Main error type for calculator operations
///
/// Every variant is recoverable and is rendered as a message; none of them
/// terminates an interactive session.
#[derive(Error, Debug)]
pub enum CalcError {
    /// One or more inputs are zero at calculation time
    #[error("Please fill in all inputs to calculate (missing: {})", join_fields(.missing))]
    IncompleteInput { missing: Vec<InputField> },

    /// Entry and stop land on the same tick, so there is no distance to size against
    #[error("Stop price equals entry price; there is no stop distance to measure")]
    ZeroStopDistance,

    /// Inputs so large that an intermediate value leaves the decimal range
    #[error("Inputs are too large to calculate: {0} overflowed")]
    Overflow(&'static str),

    /// A contract name or symbol that is not in the table
    #[error("Unknown contract: {0}")]
    UnknownContract(String),

    /// Text that does not parse as a decimal number
    #[error("Invalid number for {field}: {input:?}")]
    InvalidNumber { field: InputField, input: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Terminal setup or drawing errors
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON serialization error: {0}")]
    JsonSerialize(#[from] serde_json::Error),
}

impl CalcError {
    /// True for the conditions the form renders as a warning rather than an error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CalcError::IncompleteInput { .. }
                | CalcError::ZeroStopDistance
                | CalcError::Overflow(_)
        )
    }
}

fn join_fields(fields: &[InputField]) -> String {
    fields
        .iter()
        .map(InputField::label)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_input_lists_fields() {
        let err = CalcError::IncompleteInput {
            missing: vec![InputField::AccountSize, InputField::RiskPercent],
        };
        assert_eq!(
            err.to_string(),
            "Please fill in all inputs to calculate (missing: Account Size (AUM in $), Risk per Trade (%))"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_non_validation_errors() {
        assert!(CalcError::ZeroStopDistance.is_validation());
        assert!(!CalcError::UnknownContract("XX".into()).is_validation());
        assert!(!CalcError::Configuration("bad".into()).is_validation());
    }
}
