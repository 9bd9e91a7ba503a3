//! Progress reporting through `tracing`.

use crate::ports::progress_port::{ProgressPort, Stage};
use tracing::info;

/// Emits one `info!` line at every stage boundary.
pub struct TracingProgress;

impl ProgressPort for TracingProgress {
    fn stage_started(&self, stage: Stage) {
        info!(%stage, "stage started");
    }

    fn stage_completed(&self, stage: Stage, rows: usize) {
        info!(%stage, rows, "stage complete");
    }
}
