//! Form edit handlers
//!
//! Edits are dropped while a save or reload is in flight.

use rsettings_core::{FieldKey, FieldValue};
use tracing::{debug, warn};

use crate::state::AppState;

use super::UpdateResult;

/// Handle an edit of one setting
pub fn handle_set_field(state: &mut AppState, key: FieldKey, value: FieldValue) -> UpdateResult {
    if !state.accepts_input() {
        debug!("Ignoring edit of {} while {:?}", key, state.phase);
        return UpdateResult::none();
    }

    match state.form.set_field(key, value) {
        Ok(form) => {
            state.form = form;
            state.last_error = None;
        }
        Err(e) => {
            warn!("Rejected edit of {}: {}", key, e);
            state.last_error = Some(e.to_string());
        }
    }
    UpdateResult::none()
}

/// Handle the operator typing a secret token
pub fn handle_set_secret(state: &mut AppState, value: &str) -> UpdateResult {
    if !state.accepts_input() {
        debug!("Ignoring secret edit while {:?}", state.phase);
        return UpdateResult::none();
    }

    if state.form.secret().configured {
        // The stored secret wins until it is reset; the typed value is kept
        // but will not be sent.
        debug!("Secret typed while a stored secret is configured");
    }
    state.form = state.form.set_secret(value);
    UpdateResult::none()
}

/// Handle the operator resetting the stored secret
pub fn handle_reset_secret(state: &mut AppState) -> UpdateResult {
    if !state.accepts_input() {
        debug!("Ignoring secret reset while {:?}", state.phase);
        return UpdateResult::none();
    }

    state.form = state.form.reset_secret();
    UpdateResult::none()
}
