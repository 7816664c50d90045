//! Application state (Model in TEA pattern)

use chrono::{DateTime, Local};

use rsettings_core::{EnablementState, StoredSettings};

use crate::form::FormState;

/// Where the editing session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Waiting for the first read of the host's settings
    #[default]
    Loading,
    /// Accepting edits
    Editing,
    /// A settings-update request is in flight
    Saving,
    /// The save went through; re-reading the host
    Reloading,
    /// The session cannot continue
    Failed,
}

/// Complete application state (the Model in TEA)
#[derive(Debug, Clone)]
pub struct AppState {
    pub plugin_id: String,

    pub phase: SessionPhase,

    /// In-progress edits for the current session
    pub form: FormState,

    /// Host lifecycle flags as read at session start
    pub enablement: EnablementState,

    /// Last error to show the operator, cleared by the next successful action
    pub last_error: Option<String>,

    /// When the current session was initialized from the host
    pub loaded_at: Option<DateTime<Local>>,

    /// Number of sessions started by a post-save reload
    pub reload_count: u32,
}

impl AppState {
    pub fn new(plugin_id: impl Into<String>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            phase: SessionPhase::Loading,
            form: FormState::default(),
            enablement: EnablementState::default(),
            last_error: None,
            loaded_at: None,
            reload_count: 0,
        }
    }

    /// Replace the session with a fresh one built from the host's settings
    pub fn begin_session(&mut self, stored: &StoredSettings) {
        if self.phase == SessionPhase::Reloading {
            self.reload_count += 1;
        }
        self.form = FormState::from_stored(stored);
        self.enablement = stored.enablement();
        self.phase = SessionPhase::Editing;
        self.last_error = None;
        self.loaded_at = Some(Local::now());
    }

    /// Edits and submits are only accepted while editing
    pub fn accepts_input(&self) -> bool {
        self.phase == SessionPhase::Editing
    }

    /// Whether the save control is enabled
    pub fn can_submit(&self) -> bool {
        self.accepts_input() && self.form.can_save()
    }

    pub fn is_failed(&self) -> bool {
        self.phase == SessionPhase::Failed
    }
}
