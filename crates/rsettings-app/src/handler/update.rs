//! Main update function - handles state transitions (TEA pattern)

use crate::message::Message;
use crate::state::AppState;

use super::{form_handlers, persist_handlers, UpdateResult};

/// Process a message and update state
/// Returns the action the engine should start, if any
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        // ─────────────────────────────────────────────────────────
        // Form Edits
        // ─────────────────────────────────────────────────────────
        Message::SetField { key, value } => form_handlers::handle_set_field(state, key, value),
        Message::SetSecret(value) => form_handlers::handle_set_secret(state, &value),
        Message::ResetSecret => form_handlers::handle_reset_secret(state),

        // ─────────────────────────────────────────────────────────
        // Persistence
        // ─────────────────────────────────────────────────────────
        Message::Save => persist_handlers::handle_save(state),
        Message::Enable => persist_handlers::handle_toggle_enabled(state, true),
        Message::Disable => persist_handlers::handle_toggle_enabled(state, false),
        Message::SaveSucceeded => persist_handlers::handle_save_succeeded(state),
        Message::SaveFailed { message, fatal } => {
            persist_handlers::handle_save_failed(state, message, fatal)
        }

        // ─────────────────────────────────────────────────────────
        // Session Lifecycle
        // ─────────────────────────────────────────────────────────
        Message::Reload => persist_handlers::handle_reload(state),
        Message::SessionLoaded(stored) => persist_handlers::handle_session_loaded(state, &stored),
        Message::SessionLoadFailed(reason) => {
            persist_handlers::handle_session_load_failed(state, reason)
        }
    }
}
