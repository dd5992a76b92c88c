// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "slick")]
#[command(about = "Zero-downtime deployments with Docker and Caddy")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file (default: ./slick.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to a dotenv file loaded before the configuration (default: ./.env)
    #[arg(short, long, global = true)]
    pub env: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Deploy the configured image with zero downtime
    Deploy,

    /// List running containers
    Status,

    /// Show logs of the running instance
    Logs {
        /// Number of lines to show from the end of the logs
        #[arg(short = 'n', long)]
        tail: Option<u64>,

        /// Keep streaming new log lines
        #[arg(short, long)]
        follow: bool,
    },

    /// Print the Caddyfile that would be loaded (with port 0)
    CaddyInspect,
}
