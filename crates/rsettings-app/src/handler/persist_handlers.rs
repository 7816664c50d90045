//! Persistence and session lifecycle handlers

use rsettings_core::StoredSettings;
use tracing::{debug, error, info, warn};

use crate::state::{AppState, SessionPhase};

use super::{UpdateAction, UpdateResult};

/// Handle the save button
pub fn handle_save(state: &mut AppState) -> UpdateResult {
    if !state.accepts_input() {
        debug!("Save ignored while {:?}", state.phase);
        return UpdateResult::none();
    }
    if !state.form.can_save() {
        debug!("Save ignored: nothing to save");
        return UpdateResult::none();
    }

    state.phase = SessionPhase::Saving;
    state.last_error = None;
    UpdateResult::action(UpdateAction::SubmitSettings {
        form: Box::new(state.form.clone()),
        enablement: state.enablement,
    })
}

/// Handle the enable/disable buttons
///
/// Only the action opposite to the current state is offered, so enabling an
/// enabled plugin (or disabling a disabled one) is a no-op.
pub fn handle_toggle_enabled(state: &mut AppState, enabled: bool) -> UpdateResult {
    if !state.accepts_input() {
        debug!("Enable/disable ignored while {:?}", state.phase);
        return UpdateResult::none();
    }
    if state.enablement.enabled == enabled {
        debug!("Plugin already {}", if enabled { "enabled" } else { "disabled" });
        return UpdateResult::none();
    }

    state.phase = SessionPhase::Saving;
    state.last_error = None;
    UpdateResult::action(UpdateAction::ToggleEnabled {
        form: Box::new(state.form.clone()),
        enabled,
    })
}

pub fn handle_save_succeeded(state: &mut AppState) -> UpdateResult {
    info!("Settings for {} saved", state.plugin_id);
    UpdateResult::none()
}

/// A failed save leaves the form exactly as it was so the operator can retry
pub fn handle_save_failed(state: &mut AppState, message: String, fatal: bool) -> UpdateResult {
    if fatal {
        error!("Session for {} cannot continue: {}", state.plugin_id, message);
        state.phase = SessionPhase::Failed;
    } else {
        warn!("Save for {} failed: {}", state.plugin_id, message);
        state.phase = SessionPhase::Editing;
    }
    state.last_error = Some(message);
    UpdateResult::none()
}

pub fn handle_reload(state: &mut AppState) -> UpdateResult {
    if state.is_failed() {
        debug!("Reload ignored: session failed");
        return UpdateResult::none();
    }
    state.phase = SessionPhase::Reloading;
    UpdateResult::action(UpdateAction::LoadSession)
}

pub fn handle_session_loaded(state: &mut AppState, stored: &StoredSettings) -> UpdateResult {
    state.begin_session(stored);
    info!(
        "Session for {} started (enabled={}, secret configured={})",
        state.plugin_id,
        state.enablement.enabled,
        state.form.secret().configured
    );
    UpdateResult::none()
}

/// Without the host's settings there is nothing to edit: both the first load
/// and a post-save reload failing end the session.
pub fn handle_session_load_failed(state: &mut AppState, reason: String) -> UpdateResult {
    let message = if state.phase == SessionPhase::Reloading {
        format!("Settings were saved but could not be reloaded: {}", reason)
    } else {
        format!("Failed to load plugin settings: {}", reason)
    };
    error!("{}", message);
    state.phase = SessionPhase::Failed;
    state.last_error = Some(message);
    UpdateResult::none()
}
