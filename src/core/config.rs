/*!
 * Console configuration
 *
 * TOML file with one table per concern. Every field has a default so a
 * partial (or missing) file is valid.
 */

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding `backend.url`
pub const BACKEND_URL_ENV: &str = "REDWIFI_BACKEND_URL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub backend: BackendConfig,
    pub scan: ScanConfig,
    pub notifications: NotificationConfig,
    pub deauth: DeauthConfig,
    pub capture: CaptureConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8001".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub duration_secs: u32,
    pub history_limit: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            duration_secs: 10,
            history_limit: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub ttl_secs: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { ttl_secs: 5 }
    }
}

impl NotificationConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeauthConfig {
    pub packets: u32,
}

impl Default for DeauthConfig {
    fn default() -> Self {
        Self { packets: 50 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub channel: u32,
    pub duration_secs: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            channel: 6,
            duration_secs: 60,
        }
    }
}

impl ConsoleConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let raw = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }

    /// Load `path` if given, else defaults; then apply the environment.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                config.backend.url = url.trim().to_string();
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.backend.url, "http://localhost:8001");
        assert_eq!(config.scan.duration_secs, 10);
        assert_eq!(config.scan.history_limit, 5);
        assert_eq!(config.notifications.ttl(), Duration::from_secs(5));
        assert_eq!(config.deauth.packets, 50);
        assert_eq!(config.capture.channel, 6);
        assert_eq!(config.capture.duration_secs, 60);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: ConsoleConfig = toml::from_str(
            r#"
            [backend]
            url = "http://10.0.0.5:8001"

            [scan]
            history_limit = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.url, "http://10.0.0.5:8001");
        assert_eq!(config.scan.history_limit, 10);
        assert_eq!(config.scan.duration_secs, 10);
        assert_eq!(config.capture, CaptureConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = PathBuf::from("/tmp/test_redwifi_config.toml");
        let mut config = ConsoleConfig::default();
        config.deauth.packets = 120;

        config.save(&path).unwrap();
        let loaded = ConsoleConfig::load(&path).unwrap();
        assert_eq!(loaded, config);

        // Cleanup
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ConsoleConfig::load("/tmp/test_redwifi_config_missing.toml");
        assert!(result.is_err());
    }
}
