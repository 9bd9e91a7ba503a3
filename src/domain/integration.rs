//! Full outer join of the cleaned export and import tables.

use crate::domain::cleaning::{COUNTRY, EXPORT_VALUE, EXPORTS, IMPORT_VALUE, IMPORTS, YEARCODE};
use crate::domain::error::TradeError;
use crate::domain::table::Table;
use crate::domain::value::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub const TRADE_BALANCE: &str = "trade_balance";
pub const EXPORT_SUFFIX: &str = "_export";
pub const IMPORT_SUFFIX: &str = "_import";

const KEYS: [&str; 2] = [COUNTRY, YEARCODE];

/// Join key: exact country text, numeric year. Missing parts sort last and
/// compare equal to each other.
#[derive(Debug, Clone)]
struct JoinKey {
    country: Option<String>,
    year: Option<f64>,
}

impl JoinKey {
    fn of(row: &[Value], country: usize, year: usize) -> Self {
        Self {
            country: row[country].key_text(),
            year: row[year].as_number(),
        }
    }
}

fn missing_last<T>(a: &Option<T>, b: &Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl Ord for JoinKey {
    fn cmp(&self, other: &Self) -> Ordering {
        missing_last(&self.country, &other.country, |a, b| a.cmp(b))
            .then_with(|| missing_last(&self.year, &other.year, |a, b| a.total_cmp(b)))
    }
}

impl PartialOrd for JoinKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for JoinKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for JoinKey {}

#[derive(Default)]
struct Matches {
    left: Vec<usize>,
    right: Vec<usize>,
}

/// Where each output column takes its value from.
enum Source {
    Key(usize, usize),
    Left(usize),
    Right(usize),
}

/// Outer-join `exports` and `imports` on (country, yearcode) and derive
/// `trade_balance`.
pub fn integrate(exports: &Table, imports: &Table) -> Result<Table, TradeError> {
    let mut combined = outer_join(exports, imports)?;

    let export_idx = combined.require_column(EXPORTS, EXPORT_VALUE)?;
    let import_idx = combined.require_column(IMPORTS, IMPORT_VALUE)?;
    let balance = combined
        .rows()
        .iter()
        .map(|row| row[export_idx].checked_sub(&row[import_idx]))
        .collect();
    combined.set_column(TRADE_BALANCE, balance);

    Ok(combined)
}

/// Full outer join with `_export` / `_import` suffixes on colliding non-key
/// columns. Rows come out ordered by key.
pub fn outer_join(left: &Table, right: &Table) -> Result<Table, TradeError> {
    let l_country = left.require_column(EXPORTS, COUNTRY)?;
    let l_year = left.require_column(EXPORTS, YEARCODE)?;
    let r_country = right.require_column(IMPORTS, COUNTRY)?;
    let r_year = right.require_column(IMPORTS, YEARCODE)?;

    let (headers, sources) = joined_layout(left, right)?;

    let mut groups: BTreeMap<JoinKey, Matches> = BTreeMap::new();
    for (i, row) in left.rows().iter().enumerate() {
        groups
            .entry(JoinKey::of(row, l_country, l_year))
            .or_default()
            .left
            .push(i);
    }
    for (i, row) in right.rows().iter().enumerate() {
        groups
            .entry(JoinKey::of(row, r_country, r_year))
            .or_default()
            .right
            .push(i);
    }

    let mut out = Table::new(headers);
    for matches in groups.values() {
        let lefts: Vec<Option<&Vec<Value>>> = if matches.left.is_empty() {
            vec![None]
        } else {
            matches.left.iter().map(|&i| Some(&left.rows()[i])).collect()
        };
        let rights: Vec<Option<&Vec<Value>>> = if matches.right.is_empty() {
            vec![None]
        } else {
            matches.right.iter().map(|&i| Some(&right.rows()[i])).collect()
        };

        for l in &lefts {
            for r in &rights {
                out.push_row(assemble(&sources, *l, *r));
            }
        }
    }

    Ok(out)
}

fn joined_layout(left: &Table, right: &Table) -> Result<(Vec<String>, Vec<Source>), TradeError> {
    let is_key = |h: &str| KEYS.contains(&h);
    let mut headers = Vec::with_capacity(left.width() + right.width());
    let mut sources = Vec::with_capacity(left.width() + right.width());

    for (i, h) in left.headers().iter().enumerate() {
        if is_key(h.as_str()) {
            let r = right.require_column(IMPORTS, h)?;
            headers.push(h.clone());
            sources.push(Source::Key(i, r));
        } else if right.column_index(h).is_some() {
            headers.push(format!("{h}{EXPORT_SUFFIX}"));
            sources.push(Source::Left(i));
        } else {
            headers.push(h.clone());
            sources.push(Source::Left(i));
        }
    }

    for (i, h) in right.headers().iter().enumerate() {
        if is_key(h.as_str()) {
            continue;
        }
        if left.column_index(h).is_some() {
            headers.push(format!("{h}{IMPORT_SUFFIX}"));
        } else {
            headers.push(h.clone());
        }
        sources.push(Source::Right(i));
    }

    Ok((headers, sources))
}

fn assemble(sources: &[Source], left: Option<&Vec<Value>>, right: Option<&Vec<Value>>) -> Vec<Value> {
    sources
        .iter()
        .map(|source| match source {
            Source::Key(l, r) => match (left, right) {
                (Some(row), _) => row[*l].clone(),
                (None, Some(row)) => row[*r].clone(),
                (None, None) => Value::Missing,
            },
            Source::Left(i) => left.map_or(Value::Missing, |row| row[*i].clone()),
            Source::Right(i) => right.map_or(Value::Missing, |row| row[*i].clone()),
        })
        .collect()
}
