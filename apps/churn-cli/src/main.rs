//! Churn CLI
//!
//! Predicts customer churn from the command line using fitted artifacts.

mod error;
mod form;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use churn_core::{normalize, validate, Classifier, Scaler};
use churn_io::{load_pipeline, ChurnConfig, LoadedPipeline};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use error::CliError;
use form::{collect_selections, FormArgs};

#[derive(Debug, Parser)]
#[command(name = "churn", version, about = "Customer churn prediction")]
struct Cli {
    /// Config file (defaults to ~/.churn/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding model.json, scaler.json and label_encoders.json
    #[arg(long, global = true)]
    artifacts: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Predict churn for one customer
    Predict(PredictArgs),
    /// List the features in fitted order
    Features,
    /// Load the artifacts and report their shapes
    Check,
}

#[derive(Debug, clap::Args)]
struct PredictArgs {
    /// JSON document of customer details keyed by feature name
    #[arg(long)]
    input: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(flatten)]
    form: FormArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(e.exit_code());
        }
    };
    init_logging(&config.logging.filter);

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let CliError::Prediction(inner) = &e {
                if inner.is_fatal() {
                    tracing::error!("Artifacts are misconfigured; not retrying");
                }
            }
            eprintln!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn load_config(cli: &Cli) -> Result<ChurnConfig, CliError> {
    let mut config = ChurnConfig::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.artifacts {
        config.apply_artifact_dir(dir);
    }
    Ok(config)
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli, config: &ChurnConfig) -> Result<(), CliError> {
    match &cli.command {
        Command::Features => {
            print!("{}", render::render_features());
            Ok(())
        }
        Command::Check => {
            let pipeline = load(config)?;
            println!("encoders:   {}", pipeline.encoders().len());
            println!(
                "scaler:     {} ({} columns)",
                pipeline.scaler().kind_name(),
                pipeline.scaler().n_features()
            );
            println!(
                "classifier: {} columns, classes {:?}",
                pipeline.classifier().n_features(),
                pipeline.classifier().classes()
            );
            Ok(())
        }
        Command::Predict(args) => predict(config, args),
    }
}

/// Load every artifact before reading any request
fn load(config: &ChurnConfig) -> Result<LoadedPipeline, CliError> {
    Ok(load_pipeline(&config.artifact_paths())?)
}

fn predict(config: &ChurnConfig, args: &PredictArgs) -> Result<(), CliError> {
    let pipeline = load(config)?;

    let selections = collect_selections(args.input.as_deref(), &args.form)?;
    let record = normalize(&selections);
    let advisories = validate(&record);
    for advisory in &advisories {
        tracing::warn!("{}", advisory);
    }

    let prediction = pipeline.predict(&record)?;

    match args.format {
        OutputFormat::Text => print!("{}", render::render_prediction(&prediction)),
        OutputFormat::Json => {
            let report = render::JsonReport::new(&record, &prediction, &advisories);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
