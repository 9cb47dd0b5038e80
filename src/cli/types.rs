//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "inference-cache")]
#[command(about = "Tiered cache for AI-generated responses", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of the project hierarchy
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up a cached entry
    Get {
        /// Entry id to fetch
        key: String,

        /// Treat KEY as a prompt fingerprint and return the most
        /// recent matching entry
        #[arg(short, long)]
        fingerprint: bool,
    },

    /// Run one eviction sweep across both tiers
    Sweep,

    /// Show tier statistics and connection state
    Stats,
}
