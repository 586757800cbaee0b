//! yoloprep: prepare object-detection datasets stored in PostgreSQL.
//!
//! yoloprep pulls annotated images out of a relational store, shuffles and
//! splits them into train/val/test subsets, and writes them in the YOLO
//! training layout. It also reports class histograms and previews a random
//! image with its boxes drawn on top.
//!
//! # Modules
//!
//! - [`record`]: Annotation records and pixel-space boxes
//! - [`store`]: The [`store::RecordStore`] trait with PostgreSQL and in-memory backends
//! - [`split`]: Shuffling and train/val/test partitioning
//! - [`export`]: Writing images, label files and `data.yaml`
//! - [`stats`]: Image and per-class box counts
//! - [`preview`]: Drawing and displaying a random annotated image
//! - [`config`]: Database connection settings
//! - [`logging`]: `tracing` subscriber setup
//! - [`error`]: Error types for yoloprep operations

pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod preview;
pub mod record;
pub mod split;
pub mod stats;
pub mod store;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secrecy::SecretString;

pub use error::YoloPrepError;

use config::{apply_overrides_from, load_config, AppConfig, ConnectionSettings};
use export::{export_dataset, validate_export_options, ExportOptions};
use preview::{preview_random_image, ImageSink, SaveToFile, SystemViewer, NO_DATA_MESSAGE};
use split::SplitRatios;
use stats::{summarize, StatsOptions};
use store::PostgresStore;

/// The yoloprep CLI application.
#[derive(Parser)]
#[command(name = "yoloprep")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// TOML file with a [database] section.
    #[arg(long, global = true, env = "YOLOPREP_CONFIG")]
    config: Option<PathBuf>,

    /// PostgreSQL connection URL; takes precedence over --config.
    #[arg(long, global = true, env = "YOLOPREP_DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    /// Log filter for diagnostics on stderr (e.g. 'info', 'yoloprep=debug').
    #[arg(long, global = true, env = "YOLOPREP_LOG", default_value = logging::DEFAULT_LOG_FILTER)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Export images and YOLO labels, optionally split into train/val/test.
    Export(ExportArgs),
    /// Show the image count and the number of boxes per class.
    Stats(StatsArgs),
    /// Display a random image with its bounding boxes drawn.
    Preview(PreviewArgs),
}

/// Arguments for the export subcommand.
#[derive(clap::Args)]
struct ExportArgs {
    /// Output directory.
    output_dir: PathBuf,

    /// Maximum number of annotation rows to fetch.
    #[arg(short = 'n', long = "num-images")]
    num_images: usize,

    /// Write a flat images/ + labels/ pair instead of train/val/test.
    #[arg(long)]
    no_split: bool,

    /// Fraction of records for the train split.
    #[arg(long, default_value_t = 0.8)]
    train_ratio: f64,

    /// Fraction of records for the val split.
    #[arg(long, default_value_t = 0.1)]
    val_ratio: f64,

    /// Fraction of records for the test split (the test split always takes
    /// whatever train and val leave over).
    #[arg(long, default_value_t = 0.1)]
    test_ratio: f64,

    /// Class label to include (repeatable). Defaults to '0'.
    #[arg(short = 'c', long = "class")]
    classes: Vec<String>,

    /// Seed for a reproducible shuffle.
    #[arg(long)]
    seed: Option<u64>,

    /// Do not write data.yaml.
    #[arg(long)]
    no_data_yaml: bool,

    /// Output format for the summary ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the stats subcommand.
#[derive(clap::Args)]
struct StatsArgs {
    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,

    /// Width of histogram bars (in characters).
    #[arg(long, default_value_t = 20)]
    bar_width: usize,
}

/// Arguments for the preview subcommand.
#[derive(clap::Args)]
struct PreviewArgs {
    /// Save the annotated image here instead of opening a viewer.
    #[arg(long)]
    save: Option<PathBuf>,

    /// Viewer program to open the image with (defaults to the platform opener).
    #[arg(long, env = "YOLOPREP_VIEWER")]
    viewer: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ReportFormat {
    Text,
    Json,
}

fn parse_report_format(raw: &str) -> Result<ReportFormat, YoloPrepError> {
    match raw {
        "text" => Ok(ReportFormat::Text),
        "json" => Ok(ReportFormat::Json),
        other => Err(YoloPrepError::UnsupportedFormat(format!(
            "'{}' (supported: text, json)",
            other
        ))),
    }
}

/// Run the yoloprep CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), YoloPrepError> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level)?;

    match &cli.command {
        Some(Commands::Export(args)) => run_export(&cli, args),
        Some(Commands::Stats(args)) => run_stats(&cli, args),
        Some(Commands::Preview(args)) => run_preview(&cli, args),
        None => {
            println!("yoloprep {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Export, split and inspect object-detection datasets.");
            println!();
            println!("Run 'yoloprep --help' for usage information.");
            Ok(())
        }
    }
}

/// Resolve connection settings from the URL flag, a config file, or the
/// environment, in that order.
fn connection_settings(cli: &Cli) -> Result<ConnectionSettings, YoloPrepError> {
    if let Some(url) = &cli.database_url {
        return Ok(ConnectionSettings::Url(SecretString::new(url.clone())));
    }

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => {
            let mut config = AppConfig::default();
            apply_overrides_from(&mut config, |name| std::env::var(name).ok())?;
            config
                .validate()
                .map_err(|e| YoloPrepError::Config(format!("validation failed: {}", e)))?;
            config
        }
    };

    Ok(ConnectionSettings::Params(config.database))
}

fn connect(cli: &Cli) -> Result<PostgresStore, YoloPrepError> {
    let settings = connection_settings(cli)?;
    PostgresStore::connect(&settings)
}

/// Execute the export subcommand.
fn run_export(cli: &Cli, args: &ExportArgs) -> Result<(), YoloPrepError> {
    let format = parse_report_format(&args.output)?;

    let opts = ExportOptions {
        num_records: args.num_images,
        split_data: !args.no_split,
        ratios: SplitRatios::new(args.train_ratio, args.val_ratio, args.test_ratio),
        classes: args.classes.clone(),
        seed: args.seed,
        write_data_yaml: !args.no_data_yaml,
    };
    validate_export_options(&opts)?;

    let mut store = connect(cli)?;
    let summary = export_dataset(&mut store, &args.output_dir, &opts)?;

    match format {
        ReportFormat::Json => print_json(&summary)?,
        ReportFormat::Text => print!("{}", summary),
    }

    Ok(())
}

/// Execute the stats subcommand.
fn run_stats(cli: &Cli, args: &StatsArgs) -> Result<(), YoloPrepError> {
    let format = parse_report_format(&args.output)?;
    let opts = StatsOptions {
        bar_width: args.bar_width,
    };

    let mut store = connect(cli)?;
    let report = summarize(&mut store, &opts)?;

    match format {
        ReportFormat::Json => print_json(&report)?,
        ReportFormat::Text => print!("{}", report),
    }

    Ok(())
}

/// Execute the preview subcommand.
fn run_preview(cli: &Cli, args: &PreviewArgs) -> Result<(), YoloPrepError> {
    let mut sink: Box<dyn ImageSink> = match &args.save {
        Some(path) => Box::new(SaveToFile::new(path)),
        None => Box::new(SystemViewer::new(args.viewer.clone())),
    };

    let mut store = connect(cli)?;
    match preview_random_image(&mut store, sink.as_mut())? {
        None => println!("{}", NO_DATA_MESSAGE),
        Some(outcome) if args.save.is_some() => println!(
            "Saved image with bounding boxes from {} to {}",
            outcome.source.display(),
            outcome.shown_at.display()
        ),
        Some(outcome) => println!(
            "Displayed image with bounding boxes from: {}",
            outcome.source.display()
        ),
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), YoloPrepError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| YoloPrepError::Io(std::io::Error::other(e)))?;
    println!("{}", json);
    Ok(())
}
