//! In-memory tabular data.

use crate::domain::error::TradeError;
use crate::domain::value::Value;

/// Ordered headers plus ordered rows. Every row holds exactly one value per
/// header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let mut table = Self::new(headers);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Append a row, padding with `Missing` or truncating to the header width.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.headers.len(), Value::Missing);
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, table: &str, name: &str) -> Result<usize, TradeError> {
        self.column_index(name)
            .ok_or_else(|| TradeError::missing_column(table, name))
    }

    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    pub fn rename_headers(&mut self, f: impl Fn(&str) -> String) {
        for header in &mut self.headers {
            *header = f(header);
        }
    }

    pub fn map_column(&mut self, idx: usize, f: impl Fn(&Value) -> Value) {
        for row in &mut self.rows {
            row[idx] = f(&row[idx]);
        }
    }

    pub fn retain_rows(&mut self, f: impl FnMut(&Vec<Value>) -> bool) {
        self.rows.retain(f);
    }

    /// Set a column's values, replacing an existing column of the same name
    /// or appending a new one.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }

    /// A column is numeric when it holds no text.
    pub fn is_numeric_column(&self, idx: usize) -> bool {
        self.rows
            .iter()
            .all(|row| !matches!(row[idx], Value::Text(_)))
    }
}
