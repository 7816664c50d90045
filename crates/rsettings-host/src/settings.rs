//! Host settings boundary
//!
//! The host stores plugin configuration, owns the enabled/pinned lifecycle
//! flags and keeps secrets write-only. This module defines the narrow
//! read/replace interface the rest of the application talks to, plus the
//! reload trigger used after a successful write.

use rsettings_core::prelude::*;
use rsettings_core::{PluginSettingsUpdate, StoredSettings};

/// Read and replace plugin settings on the host.
///
/// `update_settings` performs a full replace of `jsonData` and, when
/// `secureJsonData` is present, a write-only upsert of the secret fields.
#[trait_variant::make(HostSettings: Send)]
pub trait LocalHostSettings {
    /// Read the currently stored settings for `plugin_id`
    async fn read_settings(&self, plugin_id: &str) -> Result<StoredSettings>;

    /// Submit one settings-update request for `plugin_id`
    async fn update_settings(&self, plugin_id: &str, update: &PluginSettingsUpdate) -> Result<()>;
}

/// Trigger a full resynchronization with the host after a successful write.
///
/// There is no way to refresh plugin metadata in place, so a successful save
/// is always followed by a reload. Once triggered it cannot be cancelled.
pub trait Reloader: Send + Sync {
    fn reload(&self) -> Result<()>;
}

impl<R: Reloader + ?Sized> Reloader for std::sync::Arc<R> {
    fn reload(&self) -> Result<()> {
        (**self).reload()
    }
}
