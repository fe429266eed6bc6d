//! Tool configuration loaded from `abacus.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::engine::debounce::DEFAULT_MODE_SWITCH_COOLDOWN;
use crate::engine::models::GameMode;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// JSON file holding settings and history.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    #[serde(default = "default_cooldown_ms")]
    pub mode_switch_cooldown_ms: u64,
    /// Mode a freshly opened board starts in.
    #[serde(default)]
    pub default_game_mode: GameMode,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("abacus_store.json")
}

fn default_cooldown_ms() -> u64 {
    DEFAULT_MODE_SWITCH_COOLDOWN.as_millis() as u64
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            mode_switch_cooldown_ms: default_cooldown_ms(),
            default_game_mode: GameMode::default(),
        }
    }
}

impl AppConfig {
    pub fn mode_switch_cooldown(&self) -> Duration {
        Duration::from_millis(self.mode_switch_cooldown_ms)
    }
}

/// Load configuration from a TOML file at the given path.
pub fn load_config(path: &Path) -> Result<AppConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    toml::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

/// Try well-known locations, falling back to built-in defaults.
pub fn load_default_config() -> AppConfig {
    let candidates = ["abacus.toml", "../abacus.toml", "/etc/abacus/abacus.toml"];
    for path in &candidates {
        let p = Path::new(path);
        if p.exists() {
            match load_config(p) {
                Ok(config) => {
                    tracing::info!(path = %p.display(), "loaded config");
                    return config;
                }
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "failed to load config");
                }
            }
        }
    }
    tracing::info!("no abacus.toml found, using built-in defaults");
    AppConfig::default()
}
