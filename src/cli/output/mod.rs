//! CLI output formatting module
//!
//! Provides various output formatters for terminal display.

pub mod table;

pub use table::{format_entry_detail, format_stats_table, format_sweep_table};
