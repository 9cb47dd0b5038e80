use std::sync::Arc;

use anyhow::Result;

use crate::cli::context::CliContext;
use crate::cli::output::format_sweep_table;
use crate::services::EvictionScheduler;

/// Handle the sweep command: one manual pass over both tiers.
pub async fn execute(ctx: &CliContext, json: bool) -> Result<()> {
    let scheduler = EvictionScheduler::new(Arc::clone(&ctx.orchestrator), &ctx.config);
    let report = scheduler.run_once().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format_sweep_table(&report));
    }

    if !report.is_clean() {
        anyhow::bail!("sweep finished with tier errors");
    }
    Ok(())
}
