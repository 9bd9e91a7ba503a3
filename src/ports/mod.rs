//! Port traits at the pipeline's I/O seams.

pub mod config_port;
pub mod table_port;
pub mod chart_port;
pub mod progress_port;
