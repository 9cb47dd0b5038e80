//! inference-cache CLI entry point.

use clap::Parser;

use inference_cache::cli::{commands, handle_error, load_config, Cli, CliContext, Commands};
use inference_cache::infrastructure::logging::Logger;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(&cli).await {
        handle_error(&err, cli.json);
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let _logger = Logger::init(&config.logging)?;
    let ctx = CliContext::build(config).await?;

    match &cli.command {
        Commands::Get { key, fingerprint } => {
            commands::get::execute(&ctx, key, *fingerprint, cli.json).await
        }
        Commands::Sweep => commands::sweep::execute(&ctx, cli.json).await,
        Commands::Stats => commands::stats::execute(&ctx, cli.json).await,
    }
}
