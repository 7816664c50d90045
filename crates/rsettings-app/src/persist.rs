//! Settings persistence orchestrator
//!
//! Turns a [`FormState`] snapshot into exactly one settings-update request,
//! then forces a reload. Nothing is retried and nothing is reconciled
//! locally: after a successful write the reload is the only way back to a
//! consistent view, and after a failed write the form is left as it was.

use std::sync::Arc;

use rsettings_core::prelude::*;
use rsettings_core::{EnablementState, PluginSettingsUpdate};
use rsettings_host::{HostSettings, Reloader};

use crate::form::FormState;
use crate::payload::{build_update, enablement_for_toggle};

/// Submits settings for one plugin and triggers the follow-up reload
pub struct SettingsPersister<H, R> {
    host: Arc<H>,
    reloader: R,
    plugin_id: String,
}

impl<H, R> SettingsPersister<H, R>
where
    H: HostSettings + Sync,
    R: Reloader,
{
    pub fn new(host: Arc<H>, reloader: R, plugin_id: impl Into<String>) -> Self {
        Self {
            host,
            reloader,
            plugin_id: plugin_id.into(),
        }
    }

    /// Save the form with the given enablement flags, then reload.
    ///
    /// Host failures come back as [`Error::SaveTransport`] and no reload is
    /// triggered. A reload failure after a successful write is
    /// [`Error::SaveAppliedNoReload`].
    pub async fn save(&self, form: &FormState, enablement: EnablementState) -> Result<()> {
        let update = build_update(form, enablement);
        self.submit(&update).await
    }

    /// Enable (and pin) or disable (and unpin) the plugin, saving the form
    /// alongside.
    pub async fn set_enabled(&self, form: &FormState, enabled: bool) -> Result<()> {
        let update = build_update(form, enablement_for_toggle(enabled));
        self.submit(&update).await
    }

    async fn submit(&self, update: &PluginSettingsUpdate) -> Result<()> {
        debug!(
            "Submitting settings for {} (enabled={}, pinned={}, secret included={})",
            self.plugin_id,
            update.enabled,
            update.pinned,
            update.secure_json_data.is_some()
        );

        if let Err(e) = self.host.update_settings(&self.plugin_id, update).await {
            error!("Error while updating the plugin {}: {}", self.plugin_id, e);
            return Err(Error::save_transport(e.to_string()));
        }

        info!("Settings for {} saved, reloading", self.plugin_id);

        self.reloader.reload().map_err(|e| {
            error!("Settings for {} saved but reload failed: {}", self.plugin_id, e);
            Error::save_applied_no_reload(e.to_string())
        })
    }
}
