//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `form_handlers`: Field and secret edits
//! - `persist_handlers`: Save, enable/disable, completions and reload

pub(crate) mod form_handlers;
pub(crate) mod persist_handlers;
pub(crate) mod update;

#[cfg(test)]
mod tests;

use rsettings_core::EnablementState;

use crate::form::FormState;

// Re-export main entry point
pub use update::update;

/// Actions that the engine should perform after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Submit a snapshot of the form with the given enablement flags
    SubmitSettings {
        form: Box<FormState>,
        enablement: EnablementState,
    },

    /// Submit a snapshot of the form while enabling or disabling the plugin
    ToggleEnabled { form: Box<FormState>, enabled: bool },

    /// Read the host's settings and start a new session
    LoadSession,
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional action for the engine to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            action: Some(action),
        }
    }
}
