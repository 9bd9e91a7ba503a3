//! Domain error types.

use std::path::PathBuf;

/// Top-level error type for the trade pipeline.
#[derive(Debug, thiserror::Error)]
pub enum TradeError {
    #[error("input file not found at {}; ensure the file exists", path.display())]
    MissingInputFile { path: PathBuf },

    #[error("failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("failed to persist to {target}: {reason}")]
    Persistence { target: String, reason: String },

    #[error("reporting failed: {reason}")]
    Reporting { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TradeError {
    pub fn missing_column(table: &str, column: &str) -> Self {
        TradeError::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    pub fn reporting(reason: impl Into<String>) -> Self {
        TradeError::Reporting {
            reason: reason.into(),
        }
    }
}

impl TradeError {
    /// Process exit status for this failure.
    pub fn exit_status(&self) -> u8 {
        match self {
            TradeError::Io(_) => 1,
            TradeError::ConfigParse { .. } | TradeError::ConfigInvalid { .. } => 2,
            TradeError::MissingInputFile { .. }
            | TradeError::Parse { .. }
            | TradeError::MissingColumn { .. } => 3,
            TradeError::Persistence { .. } => 4,
            TradeError::Reporting { .. } => 5,
        }
    }
}
