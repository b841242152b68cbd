// ABOUTME: Entry point for the stackpilot CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::DeployArgs;
use stackpilot::config::{self, Config};
use stackpilot::error::Result;
use stackpilot::output::{Output, OutputMode};
use std::env;
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

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let output = Output::new(mode);
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Init {
            stack,
            template,
            force,
        } => {
            config::init_config(&cwd, stack.as_deref(), template.as_deref(), force)?;
            output.success("Created stackpilot.yml");
            Ok(())
        }
        Commands::Deploy {
            destination,
            template,
            stack,
            param,
            outputs_dir,
        } => {
            let config = load_config(&cwd, destination.as_deref())?;
            let args = DeployArgs {
                template,
                stack,
                parameters: param,
                outputs_dir,
            };
            commands::deploy(config, args, output).await
        }
        Commands::Status { destination } => {
            let config = load_config(&cwd, destination.as_deref())?;
            commands::status(config, output).await
        }
        Commands::Events { destination } => {
            let config = load_config(&cwd, destination.as_deref())?;
            commands::events(config, output).await
        }
    }
}

/// Discover the config and apply destination overrides if one is named.
fn load_config(cwd: &std::path::Path, destination: Option<&str>) -> Result<Config> {
    let config = Config::discover(cwd)?;
    match destination {
        Some(dest) => config.for_destination(dest),
        None => Ok(config),
    }
}
