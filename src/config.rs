use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::difficulty::{Difficulty, GameMode};
use crate::error::{GameError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub difficulty: Difficulty,
    pub mode: GameMode,
    pub sound_enabled: bool,
    /// how often the loop wakes up without input
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            mode: GameMode::Classic,
            sound_enabled: true,
            tick_rate_ms: 100,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.tick_rate_ms == 0 || self.tick_rate_ms > 1000 {
            return Err(GameError::Config(format!(
                "tick_rate_ms must be between 1 and 1000, got {}",
                self.tick_rate_ms
            )));
        }
        Ok(())
    }
}

pub trait ConfigStore {
    /// Stored config, or the default when none can be read
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) if cfg.validate().is_ok() => cfg,
            Ok(cfg) => {
                warn!(path = %self.path.display(), ?cfg, "ignoring invalid config");
                Config::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable config, using defaults");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        cfg.validate()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
