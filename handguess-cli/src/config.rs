use handguess_core::{GameConfig, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub config_path: PathBuf,
}

impl CliConfig {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self {
            config_path: config_path.unwrap_or_else(default_config_path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Game config from disk, or the defaults when no file exists yet.
    pub fn game_config(&self) -> Result<GameConfig> {
        if self.config_path.exists() {
            tracing::debug!("Loading config from {}", self.config_path.display());
            GameConfig::load(&self.config_path)
        } else {
            Ok(GameConfig::default())
        }
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("handguess")
        .join("config.json")
}
