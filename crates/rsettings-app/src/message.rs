//! Message types for the application (TEA pattern)

use rsettings_core::{FieldKey, FieldValue, StoredSettings};

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    // ─────────────────────────────────────────────────────────
    // Form Edits
    // ─────────────────────────────────────────────────────────
    /// Operator edited a setting
    SetField { key: FieldKey, value: FieldValue },
    /// Operator typed a secret token
    SetSecret(String),
    /// Operator reset the stored secret
    ResetSecret,

    // ─────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────
    /// Save settings with the current enablement flags
    Save,
    /// Enable and pin the plugin
    Enable,
    /// Disable and unpin the plugin
    Disable,
    /// The settings update and reload trigger both went through
    SaveSucceeded,
    /// The settings update failed, or the reload could not be triggered
    SaveFailed { message: String, fatal: bool },

    // ─────────────────────────────────────────────────────────
    // Session Lifecycle
    // ─────────────────────────────────────────────────────────
    /// Re-read the host and start a fresh session
    Reload,
    /// Host settings read for a new session
    SessionLoaded(StoredSettings),
    /// Host settings could not be read
    SessionLoadFailed(String),
}

impl Message {
    /// Messages that report the end of a background task
    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            Message::SaveSucceeded
                | Message::SaveFailed { .. }
                | Message::SessionLoaded(_)
                | Message::SessionLoadFailed(_)
        )
    }
}
