//! Configuration file handling for reporter-settings
//!
//! Settings come from `config.toml` in the platform config directory, with
//! `RSETTINGS_*` environment variables taking precedence.

pub mod settings;
pub mod types;

pub use settings::{
    apply_env_overrides, default_config_path, init_config_file, load_settings,
    load_settings_with_env, ENV_HOST_URL, ENV_PLUGIN_ID, ENV_TOKEN,
};
pub use types::{HostConfig, Settings};
