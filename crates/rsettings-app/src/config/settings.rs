//! Settings parser for `config.toml`

use super::types::Settings;
use fs2::FileExt;
use rsettings_core::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.toml";
const CONFIG_DIR: &str = "reporter-settings";

pub const ENV_HOST_URL: &str = "RSETTINGS_HOST_URL";
pub const ENV_PLUGIN_ID: &str = "RSETTINGS_PLUGIN_ID";
pub const ENV_TOKEN: &str = "RSETTINGS_TOKEN";

const DEFAULT_CONFIG: &str = r#"# reporter-settings configuration

[host]
url = "http://localhost:3000"
plugin_id = "mahendrapaipuri-dashboardreporter-app"
# token = "glsa_..."       # Service account token, or set RSETTINGS_TOKEN
timeout_secs = 10
"#;

/// `<config dir>/reporter-settings/config.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
}

/// Load settings from a file, falling back to defaults when it is missing or
/// unreadable.
pub fn load_settings(config_path: &Path) -> Settings {
    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Apply `RSETTINGS_*` environment variables on top of file settings.
/// Empty variables are ignored.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Some(url) = non_empty_env(ENV_HOST_URL) {
        debug!("Host URL overridden by {}", ENV_HOST_URL);
        settings.host.url = url;
    }
    if let Some(plugin_id) = non_empty_env(ENV_PLUGIN_ID) {
        debug!("Plugin id overridden by {}", ENV_PLUGIN_ID);
        settings.host.plugin_id = plugin_id;
    }
    if let Some(token) = non_empty_env(ENV_TOKEN) {
        settings.host.token = Some(token);
    }
}

/// Load from `path` (or the default location) and apply env overrides
pub fn load_settings_with_env(path: Option<&Path>) -> Settings {
    let mut settings = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => load_settings(&path),
        None => {
            debug!("No config directory on this platform, using defaults");
            Settings::default()
        }
    };
    apply_env_overrides(&mut settings);
    settings
}

/// Write a commented default config file. Refuses to overwrite an existing one.
pub fn init_config_file(config_path: &Path) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::config(format!("Failed to create config dir: {}", e)))?;
    }

    let file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(config_path)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => {
                Error::config(format!("{} already exists", config_path.display()))
            }
            _ => Error::config(format!("Failed to create {}: {}", config_path.display(), e)),
        })?;

    file.lock_exclusive()
        .map_err(|e| Error::config(format!("Failed to lock config file: {}", e)))?;

    let mut file = file;
    file.write_all(DEFAULT_CONFIG.as_bytes())
        .map_err(|e| Error::config(format!("Failed to write config file: {}", e)))?;
    file.flush()
        .map_err(|e| Error::config(format!("Failed to flush config file: {}", e)))?;

    info!("Created config file at {:?}", config_path);
    Ok(())
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
