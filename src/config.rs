/// Optional runtime configuration read from `evil_clutches.toml`.
///
/// Gameplay constants are not configurable; this only covers where things
/// live on disk and how the loop is paced.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "evil_clutches.toml";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the background, sprite sheets and fireball image.
    pub asset_dir: PathBuf,
    /// Target ticks per second.
    pub tick_rate: u32,
    pub log_file: PathBuf,
    /// Ticks a key stays held after its last press on terminals that never
    /// report releases.
    pub hold_window: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
            tick_rate: 60,
            log_file: PathBuf::from("evil_clutches.log"),
            hold_window: 8,
        }
    }
}

impl Config {
    /// Load `evil_clutches.toml` from the working directory, falling back to
    /// defaults when the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Length of one tick.  A zero tick rate is treated as 1.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }
}
