//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod sqlite_adapter;
pub mod bar_chart_adapter;
pub mod file_config_adapter;
pub mod tracing_progress;
