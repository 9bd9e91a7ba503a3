//! Top export destinations by summed export value.

use crate::domain::cleaning::EXPORT_VALUE;
use crate::domain::error::TradeError;
use crate::domain::table::Table;
use std::collections::BTreeMap;

pub const DEFAULT_GROUP_COLUMN: &str = "name_of_the_export_country";
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DestinationTotal {
    pub country: String,
    pub total: f64,
}

/// Group by `group_column`, sum `export_value`, and keep the `limit` largest
/// totals in descending order. Missing group keys are skipped and missing
/// values count as zero. Equal totals keep alphabetical order.
pub fn top_destinations(
    table: &Table,
    group_column: &str,
    limit: usize,
) -> Result<Vec<DestinationTotal>, TradeError> {
    let group = table.column_index(group_column).ok_or_else(|| {
        TradeError::reporting(format!("grouping column '{group_column}' is absent"))
    })?;
    let value = table.column_index(EXPORT_VALUE).ok_or_else(|| {
        TradeError::reporting(format!("value column '{EXPORT_VALUE}' is absent"))
    })?;

    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for row in table.rows() {
        let Some(country) = row[group].key_text() else {
            continue;
        };
        *totals.entry(country).or_default() += row[value].as_number().unwrap_or(0.0);
    }

    if totals.is_empty() {
        return Err(TradeError::reporting(format!(
            "grouping column '{group_column}' has no values"
        )));
    }

    let mut ranked: Vec<DestinationTotal> = totals
        .into_iter()
        .map(|(country, total)| DestinationTotal { country, total })
        .collect();
    ranked.sort_by(|a, b| b.total.total_cmp(&a.total));
    ranked.truncate(limit);
    Ok(ranked)
}
