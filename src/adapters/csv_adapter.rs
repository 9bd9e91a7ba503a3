//! Delimited text adapters: input reader and combined-output sink.

use crate::domain::error::TradeError;
use crate::domain::table::Table;
use crate::domain::value::Value;
use crate::ports::table_port::{TableReader, TableSink};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Cells treated as missing on read.
pub const NA_VALUES: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
];

pub struct CsvAdapter {
    delimiter: u8,
}

impl Default for CsvAdapter {
    fn default() -> Self {
        Self::new(b',')
    }
}

impl CsvAdapter {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    fn parse_error(path: &Path, reason: impl ToString) -> TradeError {
        TradeError::Parse {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    fn cell(raw: &[u8]) -> Value {
        let text = String::from_utf8_lossy(raw);
        if NA_VALUES.iter().any(|na| *na == text) {
            Value::Missing
        } else {
            Value::Text(text.into_owned())
        }
    }
}

/// Suffix repeated header names with `.1`, `.2`, ...
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .map(|h| {
            let count = seen.entry(h.clone()).or_insert(0);
            let name = if *count == 0 {
                h.clone()
            } else {
                format!("{}.{}", h, count)
            };
            *count += 1;
            name
        })
        .collect()
}

impl TableReader for CsvAdapter {
    fn read_table(&self, path: &Path) -> Result<Table, TradeError> {
        self.ensure_exists(path)?;
        let content = fs::read(path).map_err(|e| Self::parse_error(path, e))?;

        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(content.as_slice());

        let headers: Vec<String> = rdr
            .byte_headers()
            .map_err(|e| Self::parse_error(path, e))?
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect();
        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(Self::parse_error(path, "no header row"));
        }

        let mut table = Table::new(dedupe_headers(headers));
        let mut malformed = 0usize;
        for result in rdr.byte_records() {
            let record = result.map_err(|e| Self::parse_error(path, e))?;
            if record.len() != table.width() {
                malformed += 1;
            }
            table.push_row(record.iter().map(Self::cell).collect());
        }

        if malformed > 0 {
            warn!(
                path = %path.display(),
                rows = malformed,
                "rows with a mismatched field count were padded or truncated"
            );
        }

        Ok(table)
    }
}

/// Writes the whole table to `path`, replacing any existing file.
pub struct CsvFileSink {
    path: PathBuf,
    delimiter: u8,
}

impl CsvFileSink {
    pub fn new(path: PathBuf, delimiter: u8) -> Self {
        Self { path, delimiter }
    }

    fn persistence_error(&self, reason: impl ToString) -> TradeError {
        TradeError::Persistence {
            target: self.target(),
            reason: reason.to_string(),
        }
    }

    fn write_to(&self, tmp: &Path, table: &Table) -> Result<(), TradeError> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_path(tmp)
            .map_err(|e| self.persistence_error(e))?;

        wtr.write_record(table.headers())
            .map_err(|e| self.persistence_error(e))?;
        for row in table.rows() {
            wtr.write_record(row.iter().map(|v| v.to_string()))
                .map_err(|e| self.persistence_error(e))?;
        }
        wtr.flush().map_err(|e| self.persistence_error(e))?;
        Ok(())
    }
}

impl TableSink for CsvFileSink {
    fn target(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn write_table(&self, table: &Table) -> Result<(), TradeError> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Err(e) = self.write_to(&tmp, table) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            self.persistence_error(e)
        })
    }
}
