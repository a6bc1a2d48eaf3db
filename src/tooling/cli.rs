//! CLI Tooling
//!
//! Command-line interface for the simulator: loads configuration, parses
//! the command script, executes the run under the selected strategy, writes
//! the tree dump, and renders a summary.

use crate::command::{self, queue::CommandQueue};
use crate::config::RunConfig;
use crate::error::{ConfigError, ParseError, RunError};
use crate::runner::{self, RunOptions, RunOutcome, RunReport};
use crate::sync::StrategyKind;
use clap::Parser;
use serde_json::json;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Treebench CLI - in-memory filesystem simulator for comparing lock strategies
#[derive(Parser)]
#[command(name = "treebench")]
#[command(about = "Replay a command script against an in-memory filesystem under a lock strategy")]
pub struct Cli {
    /// Command script to replay
    pub input: PathBuf,

    /// Where to write the final tree dump
    pub output: PathBuf,

    /// Worker thread count
    #[arg(long, short = 't')]
    pub threads: Option<usize>,

    /// Locking strategy protecting the shared tree
    #[arg(long, short = 's', value_enum)]
    pub strategy: Option<StrategyKind>,

    /// Configuration file path (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Summary output format (text or json)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,
}

/// Execution context carrying the merged configuration
pub struct CliContext {
    config: RunConfig,
}

impl CliContext {
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config = match config_path {
            Some(path) => RunConfig::load_from_file(&path)?,
            None => RunConfig::default(),
        };
        Ok(Self { config })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Apply CLI flags on top of the loaded configuration (CLI wins).
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(threads) = cli.threads {
            self.config.threads = threads;
        }
        if let Some(strategy) = cli.strategy {
            self.config.strategy = strategy;
        }
        if let Some(level) = &cli.log_level {
            self.config.logging.level = level.clone();
        }
        if let Some(format) = &cli.log_format {
            self.config.logging.format = format.clone();
        }
        if let Some(output) = &cli.log_output {
            self.config.logging.output = output.clone();
        }
    }

    /// Parse the script, run the apply phase, write the dump, and render a
    /// summary in the requested format.
    pub fn execute(&self, input: &Path, output: &Path, format: &str) -> Result<String, RunError> {
        let queue = CommandQueue::with_capacity(self.config.queue_capacity);

        let script = File::open(input).map_err(ParseError::Io)?;
        let admitted = command::load_script(BufReader::new(script), &queue)?;
        info!(admitted, input = %input.display(), "parsed command script");

        let options = RunOptions {
            threads: self.config.threads,
            strategy: self.config.strategy,
        };
        let RunOutcome { tree, report } = runner::execute(&queue, &options)?;

        let mut sink = BufWriter::new(File::create(output).map_err(RunError::Dump)?);
        tree.serialize(&mut sink).map_err(RunError::Dump)?;
        sink.flush().map_err(RunError::Dump)?;
        info!(output = %output.display(), "wrote tree dump");

        Ok(render_summary(&report, format))
    }
}

fn render_summary(report: &RunReport, format: &str) -> String {
    if format == "json" {
        let summary = json!({
            "strategy": report.strategy,
            "threads": report.threads,
            "elapsed_seconds": report.elapsed.as_secs_f64(),
            "stats": report.stats,
        });
        serde_json::to_string_pretty(&summary).expect("summary serialization cannot fail")
    } else {
        format!(
            "completed {} commands in {:.4} seconds (strategy {}, {} thread{})",
            report.stats.applied,
            report.elapsed.as_secs_f64(),
            report.strategy,
            report.threads,
            if report.threads == 1 { "" } else { "s" },
        )
    }
}
