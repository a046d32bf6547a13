//! Configuration: `~/.happy/config.toml`, environment overrides and `.env` loading

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::controller::{
    PageSettings, DEFAULT_FAILURE_MESSAGE, DEFAULT_SUCCESS_MESSAGE, DEFAULT_SUCCESS_ROUTE,
};
use crate::map::{MapView, Position, DEFAULT_CENTER, DEFAULT_TILE_URL, DEFAULT_ZOOM};

/// Default backend the page talks to
pub const DEFAULT_API_URL: &str = "http://localhost:3333";

/// Load environment variables from .env files
///
/// Priority order (highest to lowest):
/// 1. Current directory .env
/// 2. ~/.happy/.env
/// 3. Environment variables already set
pub fn load_dotenv() {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(path.display().to_string());
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            // dotenvy never overwrites variables that are already set
            match dotenvy::from_path(&env_file) {
                Ok(_) => loaded_from.push(env_file.display().to_string()),
                Err(e) => debug!("Failed to load {}: {}", env_file.display(), e),
            }
        }
    }

    if loaded_from.is_empty() {
        debug!("No .env files found");
    } else {
        debug!("Loaded .env from: {}", loaded_from.join(", "));
    }
}

/// Get the happy config directory path (~/.happy)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".happy"))
}

/// Configuration for the orphanage page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HappyConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub page: PageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL; `orphanages` is resolved against it
    #[serde(default = "default_api_url")]
    pub base_url: String,

    /// Request timeout in seconds (no timeout when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_center_latitude")]
    pub center_latitude: f64,

    #[serde(default = "default_center_longitude")]
    pub center_longitude: f64,

    #[serde(default = "default_zoom")]
    pub zoom: u8,

    #[serde(default = "default_tile_url")]
    pub tile_url: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_latitude: default_center_latitude(),
            center_longitude: default_center_longitude(),
            zoom: default_zoom(),
            tile_url: default_tile_url(),
        }
    }
}

impl MapConfig {
    pub fn view(&self) -> MapView {
        MapView::new(
            Position::new(self.center_latitude, self.center_longitude),
            self.zoom,
            self.tile_url.clone(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_success_route")]
    pub success_route: String,

    #[serde(default = "default_success_message")]
    pub success_message: String,

    #[serde(default = "default_failure_message")]
    pub failure_message: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            success_route: default_success_route(),
            success_message: default_success_message(),
            failure_message: default_failure_message(),
        }
    }
}

impl PageConfig {
    pub fn settings(&self) -> PageSettings {
        PageSettings {
            success_route: self.success_route.clone(),
            success_message: self.success_message.clone(),
            failure_message: self.failure_message.clone(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_center_latitude() -> f64 {
    DEFAULT_CENTER.latitude
}

fn default_center_longitude() -> f64 {
    DEFAULT_CENTER.longitude
}

fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}

fn default_tile_url() -> String {
    DEFAULT_TILE_URL.to_string()
}

fn default_success_route() -> String {
    DEFAULT_SUCCESS_ROUTE.to_string()
}

fn default_success_message() -> String {
    DEFAULT_SUCCESS_MESSAGE.to_string()
}

fn default_failure_message() -> String {
    DEFAULT_FAILURE_MESSAGE.to_string()
}

impl HappyConfig {
    /// Load config from `$HAPPY_CONFIG` or ~/.happy/config.toml
    ///
    /// A missing file is not an error: the defaults are used. `HAPPY_API_URL`
    /// overrides `api.base_url` either way.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            debug!("No config at {:?}, using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a config file
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;

        Self::from_toml(&content).context(format!("Failed to parse config file: {:?}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid TOML")
    }

    /// Get config file path: `$HAPPY_CONFIG` or ~/.happy/config.toml
    pub fn config_path() -> PathBuf {
        if let Ok(path) = env::var("HAPPY_CONFIG") {
            return PathBuf::from(path);
        }
        config_dir()
            .unwrap_or_else(|| PathBuf::from(".happy"))
            .join("config.toml")
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var("HAPPY_API_URL") {
            if !url.trim().is_empty() {
                debug!(url = %url, "API URL overridden by HAPPY_API_URL");
                self.api.base_url = url;
            }
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create config directory: {:?}", parent))?;
        }

        fs::write(path, self.to_toml()?)
            .context(format!("Failed to write config file: {:?}", path))?;

        info!("Wrote config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = HappyConfig::from_toml("").unwrap();
        assert_eq!(config, HappyConfig::default());
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.page.success_route, "/app");
        assert_eq!(config.map.zoom, 15);
    }

    #[test]
    fn test_partial_sections() {
        let config = HappyConfig::from_toml(
            r#"
            [api]
            base_url = "https://happy.example.com/api"
            timeout_secs = 5

            [map]
            zoom = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://happy.example.com/api");
        assert_eq!(config.api.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.map.zoom, 12);
        assert_eq!(config.map.center_latitude, DEFAULT_CENTER.latitude);
        assert_eq!(config.page.success_message, DEFAULT_SUCCESS_MESSAGE);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(HappyConfig::from_toml("[api\nbase_url = 1").is_err());
    }

    #[test]
    fn test_save_and_load_from() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = HappyConfig::default();
        config.page.success_route = "/dashboard".to_string();
        config.save_to(&path).unwrap();

        let loaded = HappyConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_map_view_from_config() {
        let view = MapConfig::default().view();
        assert_eq!(view, MapView::default());
    }
}
