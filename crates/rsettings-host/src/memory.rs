//! In-memory host for tests and demos
//!
//! Behaves like the real settings API: `jsonData` is replaced wholesale,
//! secrets are write-only (only their presence can be read back), and every
//! update request is recorded for inspection.

use std::sync::{Mutex, MutexGuard};

use rsettings_core::prelude::*;
use rsettings_core::{PluginSettingsUpdate, StoredSettings, SECRET_TOKEN_KEY};

use crate::settings::HostSettings;

#[derive(Debug, Default)]
struct Inner {
    stored: StoredSettings,
    secret: Option<String>,
    updates: Vec<PluginSettingsUpdate>,
    reads: usize,
    fail_next_update: Option<String>,
    fail_reads: Option<String>,
}

/// Host double holding one plugin's settings in memory
#[derive(Debug, Default)]
pub struct InMemoryHost {
    inner: Mutex<Inner>,
}

impl InMemoryHost {
    pub fn new(stored: StoredSettings) -> Self {
        Self {
            inner: Mutex::new(Inner {
                stored,
                ..Inner::default()
            }),
        }
    }

    /// Start with a secret already stored
    pub fn with_secret(stored: StoredSettings, secret: impl Into<String>) -> Self {
        let host = Self::new(stored);
        {
            let mut inner = host.lock();
            inner
                .stored
                .secure_json_fields
                .insert(SECRET_TOKEN_KEY.to_string(), true);
            inner.secret = Some(secret.into());
        }
        host
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of what a read would return
    pub fn stored(&self) -> StoredSettings {
        self.lock().stored.clone()
    }

    /// The stored secret value (not observable through the settings API)
    pub fn secret(&self) -> Option<String> {
        self.lock().secret.clone()
    }

    /// Every update request received, oldest first
    pub fn updates(&self) -> Vec<PluginSettingsUpdate> {
        self.lock().updates.clone()
    }

    pub fn read_count(&self) -> usize {
        self.lock().reads
    }

    /// Reject the next update with a request error carrying `message`
    pub fn fail_next_update(&self, message: impl Into<String>) {
        self.lock().fail_next_update = Some(message.into());
    }

    /// Reject every read with `message` until cleared with `None`
    pub fn fail_reads(&self, message: Option<String>) {
        self.lock().fail_reads = message;
    }
}

impl HostSettings for InMemoryHost {
    async fn read_settings(&self, _plugin_id: &str) -> Result<StoredSettings> {
        let mut inner = self.lock();
        inner.reads += 1;
        if let Some(message) = &inner.fail_reads {
            return Err(Error::host_request(message.clone()));
        }
        Ok(inner.stored.clone())
    }

    async fn update_settings(&self, plugin_id: &str, update: &PluginSettingsUpdate) -> Result<()> {
        let mut inner = self.lock();
        if let Some(message) = inner.fail_next_update.take() {
            return Err(Error::host_request(message));
        }

        let json_data = update.json_data.to_map()?;
        inner.stored.enabled = update.enabled;
        inner.stored.pinned = update.pinned;
        inner.stored.json_data = json_data;

        if let Some(secure) = &update.secure_json_data {
            inner.stored.secure_json_fields.insert(
                SECRET_TOKEN_KEY.to_string(),
                !secure.secret_token.is_empty(),
            );
            inner.secret = Some(secure.secret_token.clone());
        }

        inner.updates.push(update.clone());
        trace!("In-memory host applied update #{} for {}", inner.updates.len(), plugin_id);
        Ok(())
    }
}
