#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use trade_pipeline::domain::config::PipelineConfig;
use trade_pipeline::ports::progress_port::{ProgressPort, Stage};

pub const EXPORT_HEADER: &str = "Country,Yearcode,Export Value,Name of the Export Country";
pub const IMPORT_HEADER: &str = "Country,Yearcode,Import Value of each Commodity";

/// A scratch project directory with the default `data/` + `output/` layout.
pub struct Workspace {
    pub dir: TempDir,
    pub config: PipelineConfig,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        let config = PipelineConfig::rooted_at(dir.path());
        Self { dir, config }
    }

    pub fn with_exports(self, rows: &[&str]) -> Self {
        write_csv(&self.config.export_path, EXPORT_HEADER, rows);
        self
    }

    pub fn with_imports(self, rows: &[&str]) -> Self {
        write_csv(&self.config.import_path, IMPORT_HEADER, rows);
        self
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn combined_csv(&self) -> String {
        fs::read_to_string(&self.config.combined_csv_path).unwrap()
    }
}

pub fn write_csv(path: &Path, header: &str, rows: &[&str]) {
    let mut content = String::from(header);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(path, content).unwrap();
}

/// The US/FR scenario: one matched key, one export-only key, one import row
/// without a value.
pub fn sample_workspace() -> Workspace {
    Workspace::new()
        .with_exports(&["US,2020,100,Canada", "FR,2020,50,Spain"])
        .with_imports(&["US,2020,60", "DE,2021,"])
}

#[derive(Default)]
pub struct RecordingProgress {
    pub events: RefCell<Vec<(&'static str, Stage, Option<usize>)>>,
}

impl RecordingProgress {
    pub fn completed(&self) -> Vec<(Stage, usize)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|(_, stage, rows)| rows.map(|r| (*stage, r)))
            .collect()
    }
}

impl ProgressPort for RecordingProgress {
    fn stage_started(&self, stage: Stage) {
        self.events.borrow_mut().push(("started", stage, None));
    }

    fn stage_completed(&self, stage: Stage, rows: usize) {
        self.events.borrow_mut().push(("completed", stage, Some(rows)));
    }
}
