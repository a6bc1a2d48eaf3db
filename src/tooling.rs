//! Tooling & Integration Layer
//!
//! Command-line surface over the simulator core: argument parsing,
//! configuration merge, and the parse/run/dump pipeline.

pub mod cli;

pub use cli::{Cli, CliContext};
