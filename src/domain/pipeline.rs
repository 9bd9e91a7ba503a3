//! Stage orchestration: load, clean, integrate, persist, report.

use crate::domain::cleaning::{clean_exports, clean_imports};
use crate::domain::config::PipelineConfig;
use crate::domain::error::TradeError;
use crate::domain::integration::integrate;
use crate::domain::ranking::{top_destinations, DestinationTotal};
use crate::domain::table::Table;
use crate::ports::chart_port::ChartPort;
use crate::ports::progress_port::{ProgressPort, Stage};
use crate::ports::table_port::{TableReader, TableSink};
use tracing::{debug, info};

/// The adapters one run is wired to. Sinks run in order.
pub struct PipelinePorts<'a> {
    pub reader: &'a dyn TableReader,
    pub sinks: Vec<&'a dyn TableSink>,
    pub chart: &'a dyn ChartPort,
    pub progress: &'a dyn ProgressPort,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSummary {
    pub export_rows: usize,
    pub import_rows: usize,
    pub dropped_import_rows: usize,
    pub combined_rows: usize,
    pub top_destinations: Vec<DestinationTotal>,
}

/// Run every stage once. Both inputs are checked before either is read, so
/// a missing file leaves no output behind. A sink failure stops the run;
/// sinks that already ran keep what they wrote.
pub fn run_pipeline(
    config: &PipelineConfig,
    ports: &PipelinePorts<'_>,
) -> Result<PipelineSummary, TradeError> {
    let progress = ports.progress;

    // Stage 1: Load
    progress.stage_started(Stage::Load);
    ports.reader.ensure_exists(&config.export_path)?;
    ports.reader.ensure_exists(&config.import_path)?;
    let raw_exports = ports.reader.read_table(&config.export_path)?;
    let raw_imports = ports.reader.read_table(&config.import_path)?;
    debug!(
        exports = raw_exports.len(),
        imports = raw_imports.len(),
        "input tables loaded"
    );
    progress.stage_completed(Stage::Load, raw_exports.len() + raw_imports.len());

    // Stage 2: Clean
    progress.stage_started(Stage::Clean);
    let exports = clean_exports(&raw_exports)?;
    let imports = clean_imports(&raw_imports)?;
    let dropped = raw_imports.len() - imports.len();
    if dropped > 0 {
        info!(rows = dropped, "dropped import rows without a commodity value");
    }
    progress.stage_completed(Stage::Clean, exports.len() + imports.len());

    // Stage 3: Integrate
    progress.stage_started(Stage::Integrate);
    let combined = integrate(&exports, &imports)?;
    progress.stage_completed(Stage::Integrate, combined.len());

    // Stage 4: Persist
    progress.stage_started(Stage::Persist);
    persist(&combined, &ports.sinks)?;
    progress.stage_completed(Stage::Persist, combined.len());

    // Stage 5: Report
    progress.stage_started(Stage::Report);
    let ranking = top_destinations(&combined, &config.group_column, config.top_n)?;
    ports.chart.render(&ranking, &config.chart_path)?;
    progress.stage_completed(Stage::Report, ranking.len());

    Ok(PipelineSummary {
        export_rows: exports.len(),
        import_rows: imports.len(),
        dropped_import_rows: dropped,
        combined_rows: combined.len(),
        top_destinations: ranking,
    })
}

fn persist(table: &Table, sinks: &[&dyn TableSink]) -> Result<(), TradeError> {
    for sink in sinks {
        sink.write_table(table)?;
        info!(target_path = %sink.target(), rows = table.len(), "combined data saved");
    }
    Ok(())
}
