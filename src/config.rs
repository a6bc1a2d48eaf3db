//! Run configuration
//!
//! One optional TOML file supplies run defaults; CLI flags override it
//! field by field.

use crate::command::queue::DEFAULT_CAPACITY;
use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use crate::sync::StrategyKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Worker thread count
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Locking strategy protecting the shared tree
    #[serde(default = "default_strategy")]
    pub strategy: StrategyKind,

    /// Fixed maximum command count admitted for the run
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Logging section
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_threads() -> usize {
    1
}

fn default_strategy() -> StrategyKind {
    StrategyKind::None
}

fn default_queue_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            strategy: default_strategy(),
            queue_capacity: default_queue_capacity(),
            logging: LoggingConfig::default(),
        }
    }
}

impl RunConfig {
    /// Load configuration from a specific TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.threads, 1);
        assert_eq!(config.strategy, StrategyKind::None);
        assert_eq!(config.queue_capacity, DEFAULT_CAPACITY);
        assert!(config.logging.enabled);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: RunConfig = toml::from_str("threads = 4\nstrategy = \"read-write\"\n").unwrap();
        assert_eq!(config.threads, 4);
        assert_eq!(config.strategy, StrategyKind::ReadWrite);
        assert_eq!(config.queue_capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_logging_section_round_trips() {
        let config: RunConfig = toml::from_str(
            "strategy = \"exclusive\"\n\n[logging]\nlevel = \"debug\"\nformat = \"json\"\n",
        )
        .unwrap();
        assert_eq!(config.strategy, StrategyKind::Exclusive);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }
}
