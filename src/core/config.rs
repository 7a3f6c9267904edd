//! Scheduler configuration loaded from TOML.
//!
//! ```toml
//! loop_period_ms = 20
//! warn_on_overrun = true
//!
//! [journal]
//! path = "logs/scheduler.events.jsonl"
//! record_execute = false
//! memory_capacity = 256
//! ```

use crate::core::error::CommandeerError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_LOOP_PERIOD_MS: u64 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub loop_period_ms: u64,
    pub warn_on_overrun: bool,
    pub journal: JournalConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    pub path: Option<PathBuf>,
    /// `executed` fires for every command every tick; off unless asked for.
    pub record_execute: bool,
    pub memory_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            loop_period_ms: DEFAULT_LOOP_PERIOD_MS,
            warn_on_overrun: true,
            journal: JournalConfig::default(),
        }
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            path: None,
            record_execute: false,
            memory_capacity: 256,
        }
    }
}

impl SchedulerConfig {
    pub fn loop_period(&self) -> Duration {
        Duration::from_millis(self.loop_period_ms)
    }

    pub fn validate(&self) -> Result<(), CommandeerError> {
        if self.loop_period_ms == 0 {
            return Err(CommandeerError::ConfigError(
                "loop_period_ms must be greater than zero".to_string(),
            ));
        }
        if self.journal.memory_capacity == 0 {
            return Err(CommandeerError::ConfigError(
                "journal.memory_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, CommandeerError> {
        toml::to_string_pretty(self).map_err(|e| CommandeerError::ConfigError(e.to_string()))
    }
}

pub fn parse_config(content: &str) -> Result<SchedulerConfig, CommandeerError> {
    let config: SchedulerConfig =
        toml::from_str(content).map_err(|e| CommandeerError::ConfigError(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Load a config file. A missing file means defaults, not an error.
pub fn load_config(path: &Path) -> Result<SchedulerConfig, CommandeerError> {
    if !path.exists() {
        return Ok(SchedulerConfig::default());
    }
    let content = fs::read_to_string(path).map_err(CommandeerError::IoError)?;
    parse_config(&content)
}
