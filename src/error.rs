//! Error taxonomy for the simulator.
//!
//! Application errors (`ApplyError`) are expected per-command outcomes and
//! never abort a run. Parse and configuration errors are fatal before any
//! command executes.

use std::path::PathBuf;
use thiserror::Error;

/// Expected per-command failure applying a command to the tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// The path, or one of its intermediate segments, does not resolve
    #[error("not found: {0}")]
    NotFound(String),

    /// The final path segment is already taken among its siblings
    #[error("already exists: {0}")]
    AlreadyExists(String),
}

/// Fatal error parsing the command script
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: invalid command: {text:?}")]
    InvalidCommand { line: usize, text: String },

    #[error("line {line}: invalid node kind {kind:?} (expected 'f' or 'd')")]
    InvalidKind { line: usize, kind: String },

    #[error("failed to read command script: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal error in run configuration or setup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("locking strategy 'none' requires exactly one worker thread, got {0}")]
    ThreadCountForNone(usize),

    #[error("worker thread count must be at least 1")]
    ZeroThreads,

    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid logging configuration: {0}")]
    Logging(String),
}

/// Top-level run failure surfaced by the CLI layer
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to write tree dump: {0}")]
    Dump(std::io::Error),
}
