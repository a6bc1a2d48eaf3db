//! Treebench CLI Binary
//!
//! Command-line entry point for the lock-strategy filesystem simulator.

use clap::Parser;
use std::process;
use treebench::logging;
use treebench::tooling::cli::{Cli, CliContext};

fn main() {
    let cli = Cli::parse();

    // Create CLI context
    let mut context = match CliContext::new(cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };
    context.apply_overrides(&cli);

    if let Err(e) = logging::init_logging(Some(&context.config().logging)) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    // Execute run
    match context.execute(&cli.input, &cli.output, &cli.format) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
