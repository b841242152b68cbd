// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stackpilot")]
#[command(about = "Deploy infrastructure templates as stacks and follow them to completion")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print failures and the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new stackpilot.yml configuration file
    Init {
        /// Stack name to write into the config
        #[arg(long)]
        stack: Option<String>,

        /// Template path to write into the config
        #[arg(long)]
        template: Option<String>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Deploy the template and wait for the stack to settle
    Deploy {
        /// Target destination (defined in config)
        #[arg(short, long)]
        destination: Option<String>,

        /// Template file, overriding the config
        #[arg(long)]
        template: Option<PathBuf>,

        /// Stack name, overriding the config
        #[arg(long)]
        stack: Option<String>,

        /// Template parameter, repeatable
        #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        param: Vec<(String, String)>,

        /// Directory to write the stack outputs file into
        #[arg(long)]
        outputs_dir: Option<PathBuf>,
    },

    /// Show the stack's current status and outputs
    Status {
        /// Target destination (defined in config)
        #[arg(short, long)]
        destination: Option<String>,
    },

    /// List events of the stack's most recent operation
    Events {
        /// Target destination (defined in config)
        #[arg(short, long)]
        destination: Option<String>,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}
