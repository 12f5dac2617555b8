//! Configuration loader

use config::{Config, Environment, File, FileFormat};
use rust_decimal::Decimal;
use std::path::Path;

use super::types::{AppConfig, CalculatorSettings};
use crate::common::errors::{CalcError, Result};
use crate::contracts::ContractTable;
use crate::session::MAX_RISK_PERCENT;

/// Prefix for environment overrides, e.g. `SIZER__SETTINGS__LOG_LEVEL`
pub const ENV_PREFIX: &str = "SIZER";

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with SIZER_, `__` between sections)
/// 2. Configuration file (TOML format), skipped when it does not exist
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::new(path, FileFormat::Toml).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| CalcError::Configuration(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| CalcError::Configuration(e.to_string()))?;

    validate_settings(&app_config.calculator)?;
    Ok(app_config)
}

/// Parse configuration from a TOML string, without environment overrides
pub fn load_from_str(toml: &str) -> Result<AppConfig> {
    let app_config: AppConfig = Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .and_then(Config::try_deserialize::<AppConfig>)
        .map_err(|e| CalcError::Configuration(e.to_string()))?;

    validate_settings(&app_config.calculator)?;
    Ok(app_config)
}

impl AppConfig {
    /// Built-in contracts merged with the configured ones
    pub fn contract_table(&self) -> Result<ContractTable> {
        ContractTable::with_extra(self.contracts.clone())
    }
}

fn validate_settings(settings: &CalculatorSettings) -> Result<()> {
    if settings.default_risk_percent < Decimal::ZERO
        || settings.default_risk_percent > MAX_RISK_PERCENT
    {
        return Err(CalcError::Configuration(format!(
            "calculator.default_risk_percent must be between 0 and 100 (got {})",
            settings.default_risk_percent
        )));
    }

    for (name, step) in [
        ("account_step", settings.account_step),
        ("risk_step", settings.risk_step),
    ] {
        if step <= Decimal::ZERO {
            return Err(CalcError::Configuration(format!(
                "calculator.{name} must be positive (got {step})"
            )));
        }
    }

    Ok(())
}
