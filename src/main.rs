//! DropAlert - Main Entry Point
//!
//! Loads the churn model and dataset once, then renders the dashboard and
//! serves the prediction form in the terminal.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use drop_alert::{
    app::App,
    cli,
    config::{AppConfig, LogFormat, LoggingConfig},
    feature_extractor::{ChurnInput, YesNo},
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// Exit code when a required artifact is missing or unreadable.
/// clap already exits with 2 on usage errors.
const ARTIFACT_UNAVAILABLE: u8 = 3;

#[derive(Parser)]
#[command(name = "drop-alert", version, about = "Telecom churn dashboard and predictor")]
struct Cli {
    /// Configuration file (defaults to config/config.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Dashboard followed by the interactive prediction form (default)
    Page,
    /// Render the dashboard only
    Dashboard,
    /// Classify one customer given on the command line
    Predict(PredictArgs),
    /// Interactive prediction form only
    Form,
}

#[derive(Args)]
struct PredictArgs {
    #[arg(long, default_value_t = 100)]
    account_weeks: u32,
    #[arg(long, default_value = "Yes")]
    contract_renewal: YesNo,
    #[arg(long, default_value = "Yes")]
    data_plan: YesNo,
    /// GB
    #[arg(long, default_value_t = 0.0)]
    data_usage: f64,
    #[arg(long, default_value_t = 0)]
    cust_serv_calls: u32,
    #[arg(long, default_value_t = 0.0)]
    day_mins: f64,
    #[arg(long, default_value_t = 0)]
    day_calls: u32,
    #[arg(long, default_value_t = 0.0)]
    monthly_charge: f64,
    #[arg(long, default_value_t = 0.0)]
    overage_fee: f64,
    #[arg(long, default_value_t = 0.0)]
    roam_mins: f64,
}

impl From<PredictArgs> for ChurnInput {
    fn from(args: PredictArgs) -> Self {
        ChurnInput {
            account_weeks: args.account_weeks,
            contract_renewal: args.contract_renewal,
            data_plan: args.data_plan,
            data_usage: args.data_usage,
            cust_serv_calls: args.cust_serv_calls,
            day_mins: args.day_mins,
            day_calls: args.day_calls,
            monthly_charge: args.monthly_charge,
            overage_fee: args.overage_fee,
            roam_mins: args.roam_mins,
        }
    }
}

/// Logs go to stderr so they never mix with the rendered page
fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("drop_alert={}", config.level).parse()?);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
    Ok(())
}

fn run(opts: Cli) -> Result<ExitCode> {
    let config = match &opts.config {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    init_logging(&config.logging)?;
    info!(
        model = %config.artifacts.model_path.display(),
        dataset = %config.artifacts.dataset_path.display(),
        "Starting DropAlert"
    );

    let app = App::start(config);
    let mut code = ExitCode::SUCCESS;

    match opts.command.unwrap_or(Command::Page) {
        Command::Page => {
            cli::print_title();
            cli::print_dashboard(&app);
            cli::run_form(&app)?;
        }
        Command::Dashboard => {
            cli::print_title();
            cli::print_dashboard(&app);
            if app.dataset().is_err() {
                code = ExitCode::from(ARTIFACT_UNAVAILABLE);
            }
        }
        Command::Predict(args) => {
            if !cli::predict_once(&app, &args.into()) {
                code = if app.model().is_err() {
                    ExitCode::from(ARTIFACT_UNAVAILABLE)
                } else {
                    ExitCode::FAILURE
                };
            }
        }
        Command::Form => {
            cli::print_title();
            cli::run_form(&app)?;
        }
    }

    app.metrics().log_summary();
    Ok(code)
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_exit_code_differs_from_usage_errors() {
        let err = Cli::try_parse_from(["drop-alert", "predict", "--account-weeks", "-5"])
            .err()
            .unwrap();
        assert_eq!(err.exit_code(), 2);
        assert_ne!(i32::from(ARTIFACT_UNAVAILABLE), err.exit_code());
    }

    #[test]
    fn test_predict_flags_default_to_form_defaults() {
        let opts = Cli::try_parse_from(["drop-alert", "predict"]).unwrap();
        match opts.command {
            Some(Command::Predict(args)) => {
                assert_eq!(ChurnInput::from(args), ChurnInput::default());
            }
            _ => panic!("expected the predict subcommand"),
        }
    }
}
