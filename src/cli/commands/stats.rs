use anyhow::{Context, Result};
use serde::Serialize;

use crate::adapters::volatile::ConnectionSnapshot;
use crate::cli::context::CliContext;
use crate::cli::output::format_stats_table;
use crate::domain::ports::DurableStore;

#[derive(Serialize)]
struct StatsView<'a> {
    durable_entries: u64,
    durable_path: &'a str,
    retention_secs: u64,
    connection: ConnectionSnapshot,
}

/// Handle the stats command
pub async fn execute(ctx: &CliContext, json: bool) -> Result<()> {
    let durable_entries = ctx
        .orchestrator
        .durable()
        .count()
        .await
        .context("Failed to count durable entries")?;

    // Probe once so the snapshot reflects the tier, not cold state.
    let _ = ctx.orchestrator.volatile().ping().await;
    let connection = ctx.orchestrator.connection_snapshot();

    if json {
        let view = StatsView {
            durable_entries,
            durable_path: &ctx.config.durable.path,
            retention_secs: ctx.config.durable.retention_secs,
            connection,
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!(
            "{}",
            format_stats_table(
                durable_entries,
                &ctx.config.durable.path,
                ctx.config.durable.retention_secs,
                &connection,
            )
        );
    }

    Ok(())
}
