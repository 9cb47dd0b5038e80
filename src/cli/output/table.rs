//! Table output formatting for CLI commands
//!
//! Formatted output for cache entries, sweep reports, and tier statistics
//! using comfy-table.

use chrono::{DateTime, Utc};
use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};

use crate::adapters::volatile::ConnectionSnapshot;
use crate::domain::models::CacheEntry;
use crate::services::SweepReport;

/// Multi-line key/value block for a single cache entry.
pub fn format_entry_detail(entry: &CacheEntry) -> String {
    let mut table = base_table();
    table.set_header(vec![
        Cell::new("Field").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![Cell::new("Id"), Cell::new(&entry.id)]);
    table.add_row(vec![
        Cell::new("Fingerprint"),
        Cell::new(&entry.prompt_fingerprint),
    ]);
    table.add_row(vec![Cell::new("Model"), Cell::new(&entry.model_tag)]);
    table.add_row(vec![
        Cell::new("Created"),
        Cell::new(format!(
            "{} ({})",
            entry.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            format_relative_time(&entry.created_at)
        )),
    ]);
    table.add_row(vec![
        Cell::new("Payload"),
        Cell::new(truncate_text(&entry.payload, 200)),
    ]);
    if !entry.metadata.is_empty() {
        let metadata = serde_json::to_string(&entry.metadata).unwrap_or_default();
        table.add_row(vec![Cell::new("Metadata"), Cell::new(metadata)]);
    }

    table.to_string()
}

/// One row per tier with what the sweep reclaimed.
pub fn format_sweep_table(report: &SweepReport) -> String {
    let mut table = base_table();
    table.set_header(vec![
        Cell::new("Tier").add_attribute(Attribute::Bold),
        Cell::new("Scanned").add_attribute(Attribute::Bold),
        Cell::new("Deleted").add_attribute(Attribute::Bold),
        Cell::new("Outcome").add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![
        Cell::new("durable"),
        Cell::new("-"),
        Cell::new(report.durable_deleted),
        Cell::new(outcome_text(report.durable_error.as_deref())),
    ]);
    table.add_row(vec![
        Cell::new("volatile"),
        Cell::new(report.volatile_scanned),
        Cell::new(report.volatile_deleted),
        Cell::new(outcome_text(report.volatile_error.as_deref())),
    ]);

    table.to_string()
}

/// Tier overview for the stats command.
pub fn format_stats_table(
    durable_entries: u64,
    durable_path: &str,
    retention_secs: u64,
    connection: &ConnectionSnapshot,
) -> String {
    let mut table = base_table();
    table.set_header(vec![
        Cell::new("Property").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![
        Cell::new("Durable entries"),
        Cell::new(durable_entries),
    ]);
    table.add_row(vec![Cell::new("Durable path"), Cell::new(durable_path)]);
    table.add_row(vec![
        Cell::new("Retention"),
        Cell::new(format_duration_secs(retention_secs)),
    ]);
    table.add_row(vec![
        Cell::new("Volatile connection"),
        Cell::new(connection.state.as_str()),
    ]);
    if let Some(retry_in_ms) = connection.retry_in_ms {
        table.add_row(vec![
            Cell::new("Next volatile probe"),
            Cell::new(format!("in {retry_in_ms} ms")),
        ]);
    }

    table.to_string()
}

fn base_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn outcome_text(error: Option<&str>) -> String {
    match error {
        None => "ok".to_string(),
        Some(message) => format!("failed: {}", truncate_text(message, 60)),
    }
}

/// Truncate text to a maximum length, appending an ellipsis.
fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

/// Format relative time (e.g., "2 hours ago")
fn format_relative_time(datetime: &DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(*datetime);

    if duration.num_seconds() < 60 {
        "just now".to_string()
    } else if duration.num_minutes() < 60 {
        let mins = duration.num_minutes();
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if duration.num_hours() < 24 {
        let hours = duration.num_hours();
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else {
        let days = duration.num_days();
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    }
}

fn format_duration_secs(secs: u64) -> String {
    if secs % 86_400 == 0 && secs >= 86_400 {
        let days = secs / 86_400;
        format!("{} day{}", days, if days == 1 { "" } else { "s" })
    } else if secs % 3_600 == 0 && secs >= 3_600 {
        let hours = secs / 3_600;
        format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
    } else {
        format!("{secs} s")
    }
}
