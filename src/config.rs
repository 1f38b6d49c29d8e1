use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{twlog_debug, Error, Result};

fn default_max_concurrent() -> usize {
    20
}

fn default_tick_interval_ms() -> u64 {
    10_000
}

fn default_history_limit() -> usize {
    100
}

/// Scheduler configuration, loadable from `~/.taskwheel/taskwheel.toml`.
///
/// Every field has a default so a missing or partial config file is fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum number of tasks allowed in the running state at once.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_tasks: usize,
    /// Admission tick period in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Per-type performance history retention (most recent entries kept).
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_tasks: default_max_concurrent(),
            tick_interval_ms: default_tick_interval_ms(),
            history_limit: default_history_limit(),
        }
    }
}

impl SchedulerConfig {
    pub fn taskwheel_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".taskwheel"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::taskwheel_dir()?.join("taskwheel.toml"))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        twlog_debug!("SchedulerConfig::load path={}", path.display());
        if !path.exists() {
            twlog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(path)?)?;
        twlog_debug!(
            "Config loaded: max_concurrent_tasks={}, tick_interval_ms={}, history_limit={}",
            config.max_concurrent_tasks,
            config.tick_interval_ms,
            config.history_limit
        );
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let dir = Self::taskwheel_dir()?;
        if !dir.exists() {
            twlog_debug!("Creating taskwheel directory: {}", dir.display());
            fs::create_dir_all(&dir)?;
        }
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        fs::write(path, toml::to_string_pretty(self)?)?;
        twlog_debug!("Config saved to {}", path.display());
        Ok(())
    }
}
