//! CLI definition and adapter wiring.

use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::adapters::bar_chart_adapter::BarChartAdapter;
use crate::adapters::csv_adapter::{CsvAdapter, CsvFileSink};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::sqlite_adapter::SqliteAdapter;
use crate::adapters::tracing_progress::TracingProgress;
use crate::domain::config::PipelineConfig;
use crate::domain::error::TradeError;
use crate::domain::pipeline::{run_pipeline, PipelinePorts, PipelineSummary};
use crate::ports::progress_port::ProgressPort;

#[derive(Parser, Debug)]
#[command(
    name = "trade-pipeline",
    version,
    about = "Merge export and import trade data, persist it, and chart the top destinations"
)]
pub struct Cli {
    /// INI file overriding the default paths and report settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Install the stdout subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // a second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig, TradeError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            let adapter = FileConfigAdapter::from_file(path)?;
            PipelineConfig::from_port(&adapter)
        }
        None => Ok(PipelineConfig::rooted_at(Path::new(""))),
    }
}

/// Build the production adapters around `config` and run every stage.
pub fn execute(config: &PipelineConfig) -> Result<PipelineSummary, TradeError> {
    execute_with_progress(config, &TracingProgress)
}

pub fn execute_with_progress(
    config: &PipelineConfig,
    progress: &dyn ProgressPort,
) -> Result<PipelineSummary, TradeError> {
    for dir in config.output_directories() {
        fs::create_dir_all(&dir)?;
    }

    let reader = CsvAdapter::new(config.delimiter);
    let csv_sink = CsvFileSink::new(config.combined_csv_path.clone(), config.delimiter);
    let sqlite_sink = SqliteAdapter::new(config.database_path.clone(), config.table_name.clone());
    let chart = BarChartAdapter::new(config.chart.clone());

    let ports = PipelinePorts {
        reader: &reader,
        sinks: vec![&csv_sink, &sqlite_sink],
        chart: &chart,
        progress,
    };
    run_pipeline(config, &ports)
}

pub fn run(cli: Cli) -> ExitCode {
    init_tracing();
    ExitCode::from(run_status(&cli))
}

/// Run once and map the outcome to a process exit status. A missing input
/// file is not a failure.
fn run_status(cli: &Cli) -> u8 {
    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return e.exit_status();
        }
    };

    match execute(&config) {
        Ok(summary) => {
            info!(
                combined_rows = summary.combined_rows,
                chart = %config.chart_path.display(),
                "pipeline complete"
            );
            for (rank, dest) in summary.top_destinations.iter().enumerate() {
                info!(rank = rank + 1, country = %dest.country, total = dest.total, "top destination");
            }
            0
        }
        Err(e @ TradeError::MissingInputFile { .. }) => {
            warn!("{e}");
            0
        }
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            e.exit_status()
        }
    }
}
