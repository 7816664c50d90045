//! Settings-update payload assembly
//!
//! The host replaces `jsonData` wholesale, so every field is always sent.
//! The secret is only sent when the host does not already hold one the
//! operator left untouched.

use rsettings_core::{
    EnablementState, FieldKey, JsonData, PluginSettingsUpdate, SecureJsonData,
};

use crate::form::FormState;

/// Every non-secret field's current value, changed or not
pub fn build_json_data(form: &FormState) -> JsonData {
    JsonData {
        app_url: form.text(FieldKey::AppUrl),
        tls_skip_verify: form.flag(FieldKey::TlsSkipVerify),
        orientation: form.text(FieldKey::Orientation),
        layout: form.text(FieldKey::Layout),
        dashboard_mode: form.text(FieldKey::DashboardMode),
        time_zone: form.text(FieldKey::TimeZone),
        logo: form.text(FieldKey::Logo),
        max_browser_workers: form.number(FieldKey::MaxBrowserWorkers),
        max_render_workers: form.number(FieldKey::MaxRenderWorkers),
        remote_chrome_url: form.text(FieldKey::RemoteChromeUrl),
    }
}

/// `None` while a stored secret is configured; otherwise the typed value,
/// which may be empty
pub fn build_secure_json_data(form: &FormState) -> Option<SecureJsonData> {
    let secret = form.secret();
    if secret.configured {
        None
    } else {
        Some(SecureJsonData {
            secret_token: secret.value.clone(),
        })
    }
}

pub fn build_update(form: &FormState, enablement: EnablementState) -> PluginSettingsUpdate {
    PluginSettingsUpdate {
        enabled: enablement.enabled,
        pinned: enablement.pinned,
        json_data: build_json_data(form),
        secure_json_data: build_secure_json_data(form),
    }
}

/// Enabling also pins the app; disabling unpins it
pub fn enablement_for_toggle(enabled: bool) -> EnablementState {
    EnablementState::new(enabled, enabled)
}
