//! arbor CLI
//!
//! Command-line front end for the arbor AST traversal engine.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::{has_type, keys, load_config, strip, walk};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(failed) => {
            if failed {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

/// Runs the selected command. `Ok(true)` means the command completed but its
/// check failed.
fn run(cli: Cli) -> Result<bool> {
    match &cli.command {
        Commands::Walk { file } => {
            let config = load_config(cli.config.as_deref())?;
            walk::run_walk(file, &config).map(|_| false)
        }
        Commands::HasType {
            file,
            node_type,
            blacklist,
        } => {
            let config = load_config(cli.config.as_deref())?;
            has_type::run_has_type(file, node_type, blacklist, &config).map(|found| !found)
        }
        Commands::Strip {
            file,
            preserve_comments,
        } => {
            let config = load_config(cli.config.as_deref())?;
            strip::run_strip(file, *preserve_comments, &config).map(|_| false)
        }
        Commands::Keys { node_type } => keys::run_keys(node_type.as_deref()).map(|_| false),
    }
}
