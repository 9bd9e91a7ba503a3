//! Pipeline configuration.
//!
//! Every path and tunable lives here and is passed explicitly to the
//! pipeline. Defaults reproduce the fixed layout under `data/` and
//! `output/`; an INI file read through [`ConfigPort`] may override any of
//! them.

use crate::domain::error::TradeError;
use crate::domain::ranking::{DEFAULT_GROUP_COLUMN, DEFAULT_TOP_N};
use crate::ports::config_port::ConfigPort;
use std::path::{Path, PathBuf};

pub const DATA_DIR: &str = "data";
pub const OUTPUT_DIR: &str = "output";
pub const EXPORT_FILE: &str = "Export_Data.csv";
pub const IMPORT_FILE: &str = "Import_Data.csv";
pub const COMBINED_FILE: &str = "combined_trade_data.csv";
pub const DATABASE_FILE: &str = "trade_analysis.db";
pub const CHART_FILE: &str = "top_export_destinations.png";
pub const DEFAULT_TABLE: &str = "trade_data";

const MIN_CHART_SIDE: i64 = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
    /// TrueType font for labels; `None` searches well-known system locations.
    pub font_path: Option<PathBuf>,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            font_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub export_path: PathBuf,
    pub import_path: PathBuf,
    pub combined_csv_path: PathBuf,
    pub database_path: PathBuf,
    pub table_name: String,
    pub chart_path: PathBuf,
    pub group_column: String,
    pub top_n: usize,
    pub delimiter: u8,
    pub chart: ChartSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::rooted_at(Path::new(""))
    }
}

impl PipelineConfig {
    /// Default layout with `data/` and `output/` beneath `base`.
    pub fn rooted_at(base: &Path) -> Self {
        let data = base.join(DATA_DIR);
        let output = base.join(OUTPUT_DIR);
        Self {
            export_path: data.join(EXPORT_FILE),
            import_path: data.join(IMPORT_FILE),
            combined_csv_path: data.join(COMBINED_FILE),
            database_path: data.join(DATABASE_FILE),
            table_name: DEFAULT_TABLE.to_string(),
            chart_path: output.join(CHART_FILE),
            group_column: DEFAULT_GROUP_COLUMN.to_string(),
            top_n: DEFAULT_TOP_N,
            delimiter: b',',
            chart: ChartSettings::default(),
        }
    }

    /// Build from a config source. Relative paths resolve against
    /// `[paths] base_dir` (default: the working directory).
    pub fn from_port(config: &dyn ConfigPort) -> Result<Self, TradeError> {
        let base = config
            .get_string("paths", "base_dir")
            .map(PathBuf::from)
            .unwrap_or_default();
        let mut cfg = Self::rooted_at(&base);

        let path_keys: [(&str, &mut PathBuf); 5] = [
            ("export", &mut cfg.export_path),
            ("import", &mut cfg.import_path),
            ("combined_csv", &mut cfg.combined_csv_path),
            ("database", &mut cfg.database_path),
            ("chart", &mut cfg.chart_path),
        ];
        for (key, slot) in path_keys {
            if let Some(value) = config.get_string("paths", key) {
                *slot = base.join(value);
            }
        }

        if let Some(table) = config.get_string("database", "table") {
            cfg.table_name = table;
        }
        if let Some(column) = config.get_string("report", "group_column") {
            cfg.group_column = column;
        }
        if let Some(font) = config.get_string("report", "font") {
            cfg.chart.font_path = Some(base.join(font));
        }

        let top_n = config.get_int("report", "top_n", DEFAULT_TOP_N as i64);
        if top_n < 1 {
            return Err(invalid("report", "top_n", "top_n must be at least 1"));
        }
        cfg.top_n = top_n as usize;

        cfg.chart.width = chart_side(config, "width", cfg.chart.width)?;
        cfg.chart.height = chart_side(config, "height", cfg.chart.height)?;

        if let Some(delimiter) = config.get_string("input", "delimiter") {
            cfg.delimiter = parse_delimiter(&delimiter)?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), TradeError> {
        if !is_identifier(&self.table_name) {
            return Err(invalid(
                "database",
                "table",
                "table name must start with a letter or underscore and contain only letters, digits and underscores",
            ));
        }
        if self.group_column.trim().is_empty() {
            return Err(invalid("report", "group_column", "group_column must not be empty"));
        }
        Ok(())
    }

    /// Directories that must exist before any stage runs.
    pub fn output_directories(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        for path in [&self.combined_csv_path, &self.database_path, &self.chart_path] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                if !dirs.iter().any(|d| d == parent) {
                    dirs.push(parent.to_path_buf());
                }
            }
        }
        dirs
    }

    /// Every file the pipeline writes.
    pub fn output_files(&self) -> [&Path; 3] {
        [
            self.combined_csv_path.as_path(),
            self.database_path.as_path(),
            self.chart_path.as_path(),
        ]
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> TradeError {
    TradeError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn chart_side(config: &dyn ConfigPort, key: &str, default: u32) -> Result<u32, TradeError> {
    let value = config.get_int("report", key, default as i64);
    if !(MIN_CHART_SIDE..=i64::from(u16::MAX)).contains(&value) {
        return Err(invalid(
            "report",
            key,
            &format!("{key} must be between {MIN_CHART_SIDE} and {} pixels", u16::MAX),
        ));
    }
    Ok(value as u32)
}

fn parse_delimiter(value: &str) -> Result<u8, TradeError> {
    let value = match value {
        "\\t" | "tab" => "\t",
        other => other,
    };
    match value.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(invalid("input", "delimiter", "delimiter must be a single ASCII character")),
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    #[test]
    fn defaults_match_fixed_layout() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.export_path, PathBuf::from("data/Export_Data.csv"));
        assert_eq!(cfg.import_path, PathBuf::from("data/Import_Data.csv"));
        assert_eq!(cfg.combined_csv_path, PathBuf::from("data/combined_trade_data.csv"));
        assert_eq!(cfg.database_path, PathBuf::from("data/trade_analysis.db"));
        assert_eq!(cfg.chart_path, PathBuf::from("output/top_export_destinations.png"));
        assert_eq!(cfg.table_name, "trade_data");
        assert_eq!(cfg.top_n, 5);
        assert_eq!(cfg.delimiter, b',');
    }

    #[test]
    fn output_directories_are_deduplicated() {
        let cfg = PipelineConfig::rooted_at(Path::new("/tmp/run"));
        assert_eq!(
            cfg.output_directories(),
            vec![PathBuf::from("/tmp/run/data"), PathBuf::from("/tmp/run/output")]
        );
    }

    #[test]
    fn empty_config_yields_defaults() {
        let adapter = FileConfigAdapter::from_string("").unwrap();
        let cfg = PipelineConfig::from_port(&adapter).unwrap();
        assert_eq!(cfg, PipelineConfig::default());
    }

    #[test]
    fn overrides_resolve_against_base_dir() {
        let ini = r#"
[paths]
base_dir = /srv/trade
export = in/exports.csv
chart = /abs/chart.png

[database]
table = combined

[report]
top_n = 3
width = 800
font = fonts/Sans.ttf

[input]
delimiter = |
"#;
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let cfg = PipelineConfig::from_port(&adapter).unwrap();
        assert_eq!(cfg.export_path, PathBuf::from("/srv/trade/in/exports.csv"));
        assert_eq!(cfg.import_path, PathBuf::from("/srv/trade/data/Import_Data.csv"));
        assert_eq!(cfg.chart_path, PathBuf::from("/abs/chart.png"));
        assert_eq!(cfg.table_name, "combined");
        assert_eq!(cfg.top_n, 3);
        assert_eq!(cfg.chart.width, 800);
        assert_eq!(cfg.chart.height, 600);
        assert_eq!(cfg.chart.font_path, Some(PathBuf::from("/srv/trade/fonts/Sans.ttf")));
        assert_eq!(cfg.delimiter, b'|');
    }

    #[test]
    fn tab_delimiter_alias() {
        let adapter = FileConfigAdapter::from_string("[input]\ndelimiter = tab\n").unwrap();
        assert_eq!(PipelineConfig::from_port(&adapter).unwrap().delimiter, b'\t');
    }

    #[test]
    fn rejects_zero_top_n() {
        let adapter = FileConfigAdapter::from_string("[report]\ntop_n = 0\n").unwrap();
        let err = PipelineConfig::from_port(&adapter).unwrap_err();
        assert!(matches!(err, TradeError::ConfigInvalid { key, .. } if key == "top_n"));
    }

    #[test]
    fn rejects_bad_table_name() {
        let adapter =
            FileConfigAdapter::from_string("[database]\ntable = trade data\n").unwrap();
        let err = PipelineConfig::from_port(&adapter).unwrap_err();
        assert!(matches!(err, TradeError::ConfigInvalid { key, .. } if key == "table"));
    }

    #[test]
    fn rejects_tiny_chart() {
        let adapter = FileConfigAdapter::from_string("[report]\nheight = 10\n").unwrap();
        let err = PipelineConfig::from_port(&adapter).unwrap_err();
        assert!(matches!(err, TradeError::ConfigInvalid { key, .. } if key == "height"));
    }

    #[test]
    fn rejects_multi_char_delimiter() {
        let adapter = FileConfigAdapter::from_string("[input]\ndelimiter = ||\n").unwrap();
        let err = PipelineConfig::from_port(&adapter).unwrap_err();
        assert!(matches!(err, TradeError::ConfigInvalid { key, .. } if key == "delimiter"));
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("trade_data"));
        assert!(is_identifier("_t1"));
        assert!(!is_identifier("1trade"));
        assert!(!is_identifier("trade data"));
        assert!(!is_identifier(""));
    }
}
