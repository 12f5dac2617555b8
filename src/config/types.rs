//! Configuration types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::contracts::ContractSpec;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Form defaults and step sizes
    #[serde(default)]
    pub calculator: CalculatorSettings,
    /// Contracts added to (or overriding) the built-in table
    #[serde(default)]
    pub contracts: Vec<ContractSpec>,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// Calculator form settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorSettings {
    /// Risk percentage a fresh or reset form starts with
    #[serde(default = "default_risk_percent")]
    pub default_risk_percent: Decimal,
    /// Increment for the account size field
    #[serde(default = "default_account_step")]
    pub account_step: Decimal,
    /// Increment for the risk percentage field
    #[serde(default = "default_risk_step")]
    pub risk_step: Decimal,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        Self {
            default_risk_percent: default_risk_percent(),
            account_step: default_account_step(),
            risk_step: default_risk_step(),
        }
    }
}

fn default_risk_percent() -> Decimal {
    dec!(1.0)
}

fn default_account_step() -> Decimal {
    dec!(100)
}

fn default_risk_step() -> Decimal {
    dec!(0.1)
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// File that receives logs while the interactive form owns the terminal
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
