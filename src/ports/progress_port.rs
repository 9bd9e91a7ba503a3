//! Stage progress callbacks.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Clean,
    Integrate,
    Persist,
    Report,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Clean => "clean",
            Stage::Integrate => "integrate",
            Stage::Persist => "persist",
            Stage::Report => "report",
        };
        f.write_str(name)
    }
}

/// Observer notified at every stage boundary.
pub trait ProgressPort {
    fn stage_started(&self, stage: Stage);

    /// `rows` is the number of rows the stage produced or wrote.
    fn stage_completed(&self, stage: Stage, rows: usize);
}

/// Discards every event.
pub struct NoProgress;

impl ProgressPort for NoProgress {
    fn stage_started(&self, _stage: Stage) {}
    fn stage_completed(&self, _stage: Stage, _rows: usize) {}
}
