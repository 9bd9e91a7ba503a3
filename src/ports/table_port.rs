//! Table input and output port traits.

use crate::domain::error::TradeError;
use crate::domain::table::Table;
use std::path::Path;

/// Source of raw delimited tables.
pub trait TableReader {
    /// Fails with `MissingInputFile` when nothing exists at `path`.
    fn ensure_exists(&self, path: &Path) -> Result<(), TradeError> {
        if path.is_file() {
            Ok(())
        } else {
            Err(TradeError::MissingInputFile {
                path: path.to_path_buf(),
            })
        }
    }

    fn read_table(&self, path: &Path) -> Result<Table, TradeError>;
}

/// Destination that replaces its previous contents with a whole table.
pub trait TableSink {
    /// Human-readable target, used in logs and `Persistence` errors.
    fn target(&self) -> String;

    fn write_table(&self, table: &Table) -> Result<(), TradeError>;
}
