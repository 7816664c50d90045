//! Configuration types for reporter-settings
//!
//! Defines:
//! - `Settings` - Top-level contents of `config.toml`
//! - `HostConfig` - Where the Grafana host lives and how to authenticate

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Global application settings from `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub host: HostConfig,
}

/// Connection settings for the plugin host
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HostConfig {
    /// Base URL of the Grafana instance
    #[serde(default = "default_url")]
    pub url: String,

    /// Plugin whose settings are edited
    #[serde(default = "default_plugin_id")]
    pub plugin_id: String,

    /// Service account token sent as a bearer token
    #[serde(default)]
    pub token: Option<String>,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            plugin_id: default_plugin_id(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl HostConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_plugin_id() -> String {
    "mahendrapaipuri-dashboardreporter-app".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.host.url, "http://localhost:3000");
        assert_eq!(settings.host.plugin_id, "mahendrapaipuri-dashboardreporter-app");
        assert!(settings.host.token.is_none());
        assert_eq!(settings.host.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_host_section_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
[host]
url = "https://grafana.example.com"
"#,
        )
        .unwrap();

        assert_eq!(settings.host.url, "https://grafana.example.com");
        assert_eq!(settings.host.plugin_id, "mahendrapaipuri-dashboardreporter-app");
        assert_eq!(settings.host.timeout_secs, 10);
    }

    #[test]
    fn test_empty_file_is_default() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }
}
