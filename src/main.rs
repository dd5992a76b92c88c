// ABOUTME: Entry point for the slick CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use slick::error::Result;
use slick::output::{Output, OutputMode};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let output = Output::new(mode);

    if let Err(e) = run(cli, output.clone()).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let config = cli.config.as_deref();
    let env = cli.env.as_deref();

    match cli.command {
        Commands::Deploy => {
            let config = commands::load_config(config, env)?;
            commands::deploy::deploy(config, output).await
        }
        Commands::Status => commands::status::status().await,
        Commands::Logs { tail, follow } => {
            let config = commands::load_config(config, env)?;
            commands::logs::logs(&config, tail, follow).await
        }
        Commands::CaddyInspect => {
            let config = commands::load_config(config, env)?;
            commands::caddy_inspect::caddy_inspect(&config);
            Ok(())
        }
    }
}
