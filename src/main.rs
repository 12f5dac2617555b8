//! Futures Position Sizer - Main Entry Point
//!
//! Opens the interactive calculator form by default; `calc` and `contracts`
//! give the same calculator a one-shot command line surface.

use std::fs::OpenOptions;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use futures_position_sizer::config::{load_config, AppConfig};
use futures_position_sizer::report::{render_contract_list, render_json, render_text};
use futures_position_sizer::session::{InputEvent, Session};
use futures_position_sizer::{tui, InputField};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "sizer.toml", global = true)]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive calculator form (default)
    Tui,
    /// Size a single position and print the result
    Calc(CalcArgs),
    /// List the available contracts and their tick specifications
    Contracts {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(ClapArgs, Debug)]
struct CalcArgs {
    /// Contract symbol (e.g. ES) or full display name
    #[arg(short = 'C', long)]
    contract: String,

    /// Entry price
    #[arg(long, allow_hyphen_values = true)]
    entry: String,

    /// Stop price
    #[arg(long, allow_hyphen_values = true)]
    stop: String,

    /// Account size in dollars
    #[arg(long)]
    account: String,

    /// Risk per trade in percent; defaults to the configured form default
    #[arg(long)]
    risk: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<ExitCode> {
    // Parse command line arguments
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config = load_config(Some(&args.config)).context("failed to load configuration")?;
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.settings.log_level.clone());

    match args.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            // The form owns the terminal, so logs go to a file or nowhere.
            match &config.settings.log_file {
                Some(path) => {
                    let file = OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(path)
                        .with_context(|| format!("failed to open log file {path}"))?;
                    init_logging(&level, Mutex::new(file), false)?;
                }
                None => init_logging(&level, std::io::sink, false)?,
            }

            info!("Starting position sizer form");
            info!("Configuration file: {}", args.config);

            let session = new_session(&config)?;
            tui::run(session)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Calc(calc) => {
            init_logging(&level, std::io::stderr, true)?;
            run_calc(&config, calc)
        }
        Command::Contracts { json } => {
            init_logging(&level, std::io::stderr, true)?;
            let table = config.contract_table()?;
            if json {
                let specs: Vec<_> = table.iter().collect();
                println!("{}", serde_json::to_string_pretty(&specs)?);
            } else {
                println!("{}", render_contract_list(table.iter()));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging<W>(level: &str, writer: W, ansi: bool) -> Result<()>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let level = match level.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    };

    // RUST_LOG wins over the configured level when it is set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(ansi)
        .with_writer(writer)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn new_session(config: &AppConfig) -> Result<Session> {
    let table = config.contract_table()?;
    Ok(Session::new(table, config.calculator.clone()))
}

fn run_calc(config: &AppConfig, args: CalcArgs) -> Result<ExitCode> {
    let mut session = prepare_calc(config, &args)?;

    let spec = session.contract().clone();
    let outcome = session.calculate();

    if args.json {
        println!("{}", render_json(&spec, outcome)?);
    } else {
        println!("{}", render_text(&spec, outcome));
    }

    Ok(ExitCode::from(outcome.exit_status()))
}

/// Session with the `calc` arguments applied, ready to calculate
fn prepare_calc(config: &AppConfig, args: &CalcArgs) -> Result<Session> {
    let mut session = new_session(config)?;

    let name = session
        .table()
        .resolve(&args.contract)
        .map(|spec| spec.name.clone())
        .context("run `position_sizer contracts` to list available symbols")?;
    session.apply(InputEvent::SelectContract(name));

    session.set_text(InputField::EntryPrice, &args.entry)?;
    session.set_text(InputField::StopPrice, &args.stop)?;
    session.set_text(InputField::AccountSize, &args.account)?;
    if let Some(risk) = &args.risk {
        session.set_text(InputField::RiskPercent, risk)?;
    }

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_position_sizer::CalcError;
    use rust_decimal_macros::dec;

    fn calc_args(argv: &[&str]) -> CalcArgs {
        let args = Args::try_parse_from(argv).unwrap();
        match args.command {
            Some(Command::Calc(calc)) => calc,
            other => panic!("expected calc, got {other:?}"),
        }
    }

    #[test]
    fn test_calc_sizes_by_symbol() {
        let args = calc_args(&[
            "position_sizer", "calc", "-C", "nq", "--entry", "18000", "--stop", "17950",
            "--account", "50000", "--risk", "2",
        ]);
        let mut session = prepare_calc(&AppConfig::default(), &args).unwrap();

        let outcome = session.calculate();
        assert_eq!(outcome.position().unwrap().recommended_size, 1);
        assert_eq!(outcome.exit_status(), 0);
    }

    #[test]
    fn test_calc_missing_account_exits_with_failure() {
        let args = calc_args(&[
            "position_sizer", "calc", "-C", "ES", "--entry", "4500", "--stop", "4495",
            "--account", "0",
        ]);
        let mut session = prepare_calc(&AppConfig::default(), &args).unwrap();
        assert_eq!(session.calculate().exit_status(), 1);
    }

    #[test]
    fn test_calc_unknown_symbol() {
        let args = calc_args(&[
            "position_sizer", "calc", "-C", "XYZ", "--entry", "1", "--stop", "0.5",
            "--account", "1000",
        ]);
        let err = prepare_calc(&AppConfig::default(), &args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CalcError>(),
            Some(CalcError::UnknownContract(name)) if name == "XYZ"
        ));
        assert!(format!("{err:#}").contains("position_sizer contracts"));
    }

    #[test]
    fn test_calc_accepts_negative_prices() {
        let args = calc_args(&[
            "position_sizer", "calc", "-C", "CL", "--entry", "-1.00", "--stop", "-1.50",
            "--account", "10000",
        ]);
        let session = prepare_calc(&AppConfig::default(), &args).unwrap();
        assert_eq!(session.state().stop_price, dec!(-1.50));
    }
}
