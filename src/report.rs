//! Rendering of calculation outcomes for the command line

use rust_decimal::Decimal;
use serde::Serialize;

use crate::common::errors::Result;
use crate::contracts::ContractSpec;
use crate::session::Outcome;
use crate::sizing::calculator::PositionSize;
use crate::sizing::tick::format_price;

pub const SUCCESS_MESSAGE: &str = "Position Size Calculated!";

/// Dollar amount with at least two decimals (`12.5` → `$12.50`, `15.625` stays)
pub fn format_money(value: Decimal) -> String {
    let mut normalized = value.normalize();
    if normalized.scale() < 2 {
        normalized.rescale(2);
    }
    format!("${normalized}")
}

/// "Tick Size: 0.25 | Tick Value: $12.50"
pub fn tick_summary(spec: &ContractSpec) -> String {
    format!(
        "Tick Size: {} | Tick Value: {}",
        spec.tick_size.normalize(),
        format_money(spec.tick_value)
    )
}

/// Labelled result rows, in display order
pub fn result_rows(size: &PositionSize) -> [(&'static str, String); 4] {
    [
        (
            "Risk per Trade",
            format!("${}", size.risk_per_trade_display()),
        ),
        (
            "Stop Distance",
            format!("{} ticks", size.stop_distance_display()),
        ),
        (
            "Calculated Position Size",
            format!("{} contracts", size.raw_position_size_display()),
        ),
        (
            "Recommended Position Size",
            format!("{} contracts (rounded down)", size.recommended_size),
        ),
    ]
}

/// Plain-text report of an outcome
pub fn render_text(spec: &ContractSpec, outcome: &Outcome) -> String {
    let mut lines = vec![
        format!("Contract: {}", spec.name),
        tick_summary(spec),
    ];

    match outcome {
        Outcome::Sized(size) => {
            lines.push(format!(
                "Entry Price: {} | Stop Price: {}",
                format_price(size.entry_price, spec.tick_size),
                format_price(size.stop_price, spec.tick_size)
            ));
            if let Some(advisory) = size.advisory {
                lines.push(format!("Advisory: {}", advisory.message()));
            }
            lines.push(SUCCESS_MESSAGE.to_string());
            lines.extend(
                result_rows(size)
                    .into_iter()
                    .map(|(label, value)| format!("{label}: {value}")),
            );
        }
        Outcome::Rejected(err) => lines.push(format!("Warning: {err}")),
    }

    lines.join("\n")
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum ReportStatus {
    Sized,
    Advisory,
    Warning,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    status: ReportStatus,
    contract: &'a ContractSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a PositionSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// JSON report of an outcome
pub fn render_json(spec: &ContractSpec, outcome: &Outcome) -> Result<String> {
    let report = match outcome {
        Outcome::Sized(size) => JsonReport {
            status: if size.advisory.is_some() {
                ReportStatus::Advisory
            } else {
                ReportStatus::Sized
            },
            contract: spec,
            result: Some(size),
            message: size.advisory.map(|advisory| advisory.message().to_string()),
        },
        Outcome::Rejected(err) => JsonReport {
            status: ReportStatus::Warning,
            contract: spec,
            result: None,
            message: Some(err.to_string()),
        },
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

/// One line per contract: symbol, name, tick size, tick value
pub fn render_contract_list<'a>(specs: impl Iterator<Item = &'a ContractSpec>) -> String {
    specs
        .map(|spec| {
            format!(
                "{:<5} {:<30} {:>10} {:>10}",
                spec.symbol(),
                spec.name,
                spec.tick_size.normalize(),
                format_money(spec.tick_value)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
