//! Agent Pool CLI Binary
//!
//! Command-line interface for loading, inspecting and watching agent pool
//! configuration.

use agent_pool::cli::{Cli, CliContext};
use agent_pool::logging::init_logging;
use anyhow::Context;
use clap::Parser;
use std::process;

fn run(cli: &Cli) -> anyhow::Result<String> {
    let context = CliContext::from_cli(cli).context("Error loading settings")?;
    init_logging(Some(&context.settings().logging)).context("Error initializing logging")?;
    let output = context.execute(&cli.command)?;
    Ok(output)
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
