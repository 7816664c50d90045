//! Tests for handler module

use super::*;
use crate::message::Message;
use crate::state::{AppState, SessionPhase};
use rsettings_core::{EnablementState, FieldKey, FieldValue, StoredSettings};

/// Helper to create a state with a session already loaded
fn editing_state(stored: StoredSettings) -> AppState {
    let mut state = AppState::new("reporter-app");
    update(&mut state, Message::SessionLoaded(stored));
    state
}

fn stored(enabled: bool, json: serde_json::Value) -> StoredSettings {
    StoredSettings {
        enabled,
        pinned: enabled,
        json_data: json.as_object().cloned().unwrap_or_default(),
        ..StoredSettings::default()
    }
}

fn set_app_url(url: &str) -> Message {
    Message::SetField {
        key: FieldKey::AppUrl,
        value: FieldValue::Text(url.to_string()),
    }
}

#[test]
fn test_session_loaded_starts_editing() {
    let state = editing_state(stored(true, serde_json::json!({ "maxRenderWorkers": 4 })));
    assert_eq!(state.phase, SessionPhase::Editing);
    assert_eq!(state.enablement, EnablementState::new(true, true));
    assert_eq!(state.form.number(FieldKey::MaxRenderWorkers), 4);
}

#[test]
fn test_edits_ignored_while_loading() {
    let mut state = AppState::new("reporter-app");
    update(&mut state, set_app_url("http://host:3000"));
    assert!(state.form.changed_keys().is_empty());
}

#[test]
fn test_set_field_updates_form() {
    let mut state = editing_state(StoredSettings::default());
    update(&mut state, set_app_url("http://host:3000"));

    assert_eq!(state.form.text(FieldKey::AppUrl), "http://host:3000");
    assert_eq!(state.form.changed_keys(), vec![FieldKey::AppUrl]);
}

#[test]
fn test_invalid_edit_sets_error_and_keeps_form() {
    let mut state = editing_state(StoredSettings::default());
    let before = state.form.clone();
    update(
        &mut state,
        Message::SetField {
            key: FieldKey::Layout,
            value: FieldValue::Text("mosaic".into()),
        },
    );

    assert_eq!(state.form, before);
    assert!(state.last_error.as_deref().unwrap().contains("layout"));

    update(&mut state, set_app_url("http://host:3000"));
    assert!(state.last_error.is_none());
}

#[test]
fn test_save_disabled_when_nothing_to_save() {
    let mut state = editing_state(StoredSettings::default());
    let result = update(&mut state, Message::Save);

    assert!(result.action.is_none());
    assert_eq!(state.phase, SessionPhase::Editing);
}

#[test]
fn test_save_submits_snapshot_and_enters_saving() {
    let mut state = editing_state(stored(true, serde_json::json!({})));
    update(&mut state, set_app_url("http://host:3000"));

    let result = update(&mut state, Message::Save);

    assert_eq!(state.phase, SessionPhase::Saving);
    match result.action {
        Some(UpdateAction::SubmitSettings { form, enablement }) => {
            assert_eq!(*form, state.form);
            assert_eq!(enablement, EnablementState::new(true, true));
        }
        other => panic!("expected SubmitSettings, got {:?}", other),
    }
}

#[test]
fn test_no_edits_or_second_save_while_saving() {
    let mut state = editing_state(StoredSettings::default());
    update(&mut state, set_app_url("http://host:3000"));
    update(&mut state, Message::Save);
    let snapshot = state.form.clone();

    update(&mut state, set_app_url("http://other:3000"));
    update(&mut state, Message::SetSecret("late".into()));
    update(&mut state, Message::ResetSecret);
    let second = update(&mut state, Message::Save);
    let toggle = update(&mut state, Message::Enable);

    assert!(second.action.is_none());
    assert!(toggle.action.is_none());
    assert_eq!(state.form, snapshot);
}

#[test]
fn test_save_failed_returns_to_editing_with_form_intact() {
    let mut state = editing_state(StoredSettings::default());
    update(&mut state, set_app_url("http://host:3000"));
    update(&mut state, Message::SetSecret("token".into()));
    update(&mut state, Message::Save);
    let before = state.form.clone();

    update(
        &mut state,
        Message::SaveFailed {
            message: "connection refused".into(),
            fatal: false,
        },
    );

    assert_eq!(state.phase, SessionPhase::Editing);
    assert_eq!(state.form, before);
    assert_eq!(state.last_error.as_deref(), Some("connection refused"));

    // Retry is possible without re-entering anything
    let retry = update(&mut state, Message::Save);
    assert!(matches!(retry.action, Some(UpdateAction::SubmitSettings { .. })));
}

#[test]
fn test_fatal_save_failure_ends_session() {
    let mut state = editing_state(StoredSettings::default());
    update(&mut state, set_app_url("http://host:3000"));
    update(&mut state, Message::Save);

    update(
        &mut state,
        Message::SaveFailed {
            message: "reload unavailable".into(),
            fatal: true,
        },
    );

    assert!(state.is_failed());
    let result = update(&mut state, Message::Reload);
    assert!(result.action.is_none());
}

#[test]
fn test_enable_only_when_disabled() {
    let mut state = editing_state(stored(false, serde_json::json!({})));
    assert!(update(&mut state, Message::Disable).action.is_none());

    let result = update(&mut state, Message::Enable);
    assert!(matches!(
        result.action,
        Some(UpdateAction::ToggleEnabled { enabled: true, .. })
    ));
    assert_eq!(state.phase, SessionPhase::Saving);
}

#[test]
fn test_disable_when_enabled_ignores_can_save() {
    let mut state = editing_state(stored(true, serde_json::json!({})));
    assert!(!state.form.can_save());

    let result = update(&mut state, Message::Disable);
    assert!(matches!(
        result.action,
        Some(UpdateAction::ToggleEnabled { enabled: false, .. })
    ));
}

#[test]
fn test_reload_requests_new_session() {
    let mut state = editing_state(StoredSettings::default());
    update(&mut state, set_app_url("http://host:3000"));
    update(&mut state, Message::Save);

    let result = update(&mut state, Message::Reload);
    assert_eq!(state.phase, SessionPhase::Reloading);
    assert!(matches!(result.action, Some(UpdateAction::LoadSession)));

    update(&mut state, Message::SaveSucceeded);
    update(
        &mut state,
        Message::SessionLoaded(stored(false, serde_json::json!({ "appURL": "http://host:3000" }))),
    );

    assert_eq!(state.phase, SessionPhase::Editing);
    assert_eq!(state.reload_count, 1);
    assert!(state.form.changed_keys().is_empty());
    assert_eq!(state.form.text(FieldKey::AppUrl), "http://host:3000");
}

#[test]
fn test_reload_load_failure_is_fatal() {
    let mut state = editing_state(StoredSettings::default());
    state.phase = SessionPhase::Reloading;

    update(&mut state, Message::SessionLoadFailed("host down".into()));

    assert!(state.is_failed());
    assert!(state.last_error.as_deref().unwrap().contains("saved"));
}

#[test]
fn test_initial_load_failure_is_fatal() {
    let mut state = AppState::new("reporter-app");
    update(&mut state, Message::SessionLoadFailed("401 Unauthorized".into()));

    assert!(state.is_failed());
    assert!(state.last_error.as_deref().unwrap().contains("401"));
}

#[test]
fn test_set_secret_then_reset() {
    let mut state = editing_state(StoredSettings {
        secure_json_fields: [(rsettings_core::SECRET_TOKEN_KEY.to_string(), true)]
            .into_iter()
            .collect(),
        ..StoredSettings::default()
    });
    assert!(state.form.secret().configured);

    update(&mut state, Message::SetSecret(" typed ".into()));
    assert_eq!(state.form.secret().value, "typed");
    assert!(state.form.secret().configured);

    update(&mut state, Message::ResetSecret);
    assert!(!state.form.secret().configured);
    assert_eq!(state.form.secret().value, "");
}
