//! Core domain types and logic.

pub mod value;
pub mod table;
pub mod cleaning;
pub mod integration;
pub mod ranking;
pub mod config;
pub mod pipeline;
pub mod error;
