use anyhow::{Context, Result};

use crate::cli::context::CliContext;
use crate::cli::output::format_entry_detail;

/// Handle the get command
pub async fn execute(ctx: &CliContext, key: &str, by_fingerprint: bool, json: bool) -> Result<()> {
    let entry = if by_fingerprint {
        ctx.orchestrator
            .get_by_fingerprint(key)
            .await
            .context("Failed to query by fingerprint")?
    } else {
        ctx.orchestrator
            .get(key)
            .await
            .context("Failed to fetch entry")?
    };

    let entry = entry.ok_or_else(|| {
        anyhow::anyhow!(
            "No cache entry found for {} '{}'",
            if by_fingerprint { "fingerprint" } else { "id" },
            key
        )
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        println!("{}", format_entry_detail(&entry));
    }

    Ok(())
}
