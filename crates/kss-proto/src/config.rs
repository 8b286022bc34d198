use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub push: PushConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the KSS device, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Health probe period. Fixed cadence, no backoff on failure.
    #[serde(default = "default_health_interval_secs")]
    pub health_interval_secs: u64,
    /// Unread-count probe period. Ticks are skipped while disconnected.
    #[serde(default = "default_unread_interval_secs")]
    pub unread_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// User-configurable paths for saved images and app data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory event images are saved into.
    /// Defaults to `~/kss-images`.
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,
    #[serde(default = "default_settings_file")]
    pub settings_file: PathBuf,
}

/// Push-notification registration. The token itself is produced by the
/// device platform; we only forward it to the sensor once at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushConfig {
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            health_interval_secs: default_health_interval_secs(),
            unread_interval_secs: default_unread_interval_secs(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            images_dir: default_images_dir(),
            settings_file: default_settings_file(),
        }
    }
}

fn default_base_url() -> String {
    "http://rpi.local:8080".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    4000
}

fn default_health_interval_secs() -> u64 {
    5
}

fn default_unread_interval_secs() -> u64 {
    2
}

fn default_page_size() -> u32 {
    10
}

fn default_images_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kss-images")
}

fn default_settings_file() -> PathBuf {
    platform::data_dir().join("settings.json")
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            polling: PollingConfig::default(),
            feed: FeedConfig::default(),
            paths: PathsConfig::default(),
            push: PushConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.base_url, "http://rpi.local:8080");
        assert_eq!(config.polling.health_interval_secs, 5);
        assert_eq!(config.polling.unread_interval_secs, 2);
        assert_eq!(config.feed.page_size, 10);
        assert!(config.push.token.is_none());
        assert!(config.paths.settings_file.ends_with("kss/settings.json"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            base_url = "http://10.0.2.2:8080"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.base_url, "http://10.0.2.2:8080");
        assert_eq!(config.polling.health_interval_secs, 5);
        assert_eq!(config.feed.page_size, 10);
    }
}
