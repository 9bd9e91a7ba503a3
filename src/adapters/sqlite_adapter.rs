//! SQLite table sink.

use crate::domain::error::TradeError;
use crate::domain::table::Table;
use crate::domain::value::Value;
use crate::ports::table_port::TableSink;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};
use std::path::PathBuf;

/// Replaces a named table in a SQLite database file with the full contents
/// of a [`Table`]. The connection lives only for the duration of one write.
pub struct SqliteAdapter {
    path: PathBuf,
    table_name: String,
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Missing => SqlValue::Null,
        Value::Number(n) => SqlValue::Real(*n),
        Value::Text(s) => SqlValue::Text(s.clone()),
    }
}

impl SqliteAdapter {
    pub fn new(path: PathBuf, table_name: impl Into<String>) -> Self {
        Self {
            path,
            table_name: table_name.into(),
        }
    }

    fn create_statement(&self, table: &Table) -> String {
        let columns: Vec<String> = table
            .headers()
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let affinity = if table.is_numeric_column(i) { "REAL" } else { "TEXT" };
                format!("{} {}", quote_ident(h), affinity)
            })
            .collect();
        format!(
            "CREATE TABLE {} ({})",
            quote_ident(&self.table_name),
            columns.join(", ")
        )
    }

    fn insert_statement(&self, table: &Table) -> String {
        let columns: Vec<String> = table.headers().iter().map(|h| quote_ident(h)).collect();
        let placeholders: Vec<String> = (1..=table.width()).map(|i| format!("?{i}")).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(&self.table_name),
            columns.join(", "),
            placeholders.join(", ")
        )
    }

    fn replace(&self, table: &Table) -> Result<(), rusqlite::Error> {
        let mut conn = Connection::open(&self.path)?;
        let tx = conn.transaction()?;

        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {};",
            quote_ident(&self.table_name)
        ))?;
        tx.execute(&self.create_statement(table), [])?;
        {
            let mut stmt = tx.prepare(&self.insert_statement(table))?;
            for row in table.rows() {
                stmt.execute(params_from_iter(row.iter().map(to_sql)))?;
            }
        }
        tx.commit()
    }
}

impl TableSink for SqliteAdapter {
    fn target(&self) -> String {
        format!("sqlite:{}#{}", self.path.display(), self.table_name)
    }

    fn write_table(&self, table: &Table) -> Result<(), TradeError> {
        if table.width() == 0 {
            return Err(TradeError::Persistence {
                target: self.target(),
                reason: "table has no columns".into(),
            });
        }
        self.replace(table)
            .map_err(|e: rusqlite::Error| TradeError::Persistence {
                target: self.target(),
                reason: e.to_string(),
            })
    }
}
