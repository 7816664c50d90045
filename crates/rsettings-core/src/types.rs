//! Domain types for reporter plugin settings
//!
//! Defines:
//! - `FieldKey` / `FieldKind` / `FieldValue` - the editable settings and their values
//! - `EnablementState` - host-owned enabled/pinned flags
//! - `StoredSettings` - what the host returns when settings are read
//! - `JsonData`, `SecureJsonData`, `PluginSettingsUpdate` - the settings-update payload

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Wire name of the write-only secret stored by the host
pub const SECRET_TOKEN_KEY: &str = "secretToken";

/// Stored `jsonData` as returned by the host: possibly partial, possibly malformed
pub type PartialConfig = serde_json::Map<String, Value>;

const ORIENTATION_OPTIONS: &[&str] = &["portrait", "landscape"];
const LAYOUT_OPTIONS: &[&str] = &["simple", "grid"];
const DASHBOARD_MODE_OPTIONS: &[&str] = &["default", "full"];

// ─────────────────────────────────────────────────────────────────────────────
// Field keys
// ─────────────────────────────────────────────────────────────────────────────

/// One editable (non-secret) plugin setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    AppUrl,
    TlsSkipVerify,
    Orientation,
    Layout,
    DashboardMode,
    TimeZone,
    Logo,
    MaxBrowserWorkers,
    MaxRenderWorkers,
    RemoteChromeUrl,
}

impl FieldKey {
    /// Every key, in the order the settings are documented
    pub const ALL: [FieldKey; 10] = [
        FieldKey::AppUrl,
        FieldKey::TlsSkipVerify,
        FieldKey::Orientation,
        FieldKey::Layout,
        FieldKey::DashboardMode,
        FieldKey::TimeZone,
        FieldKey::Logo,
        FieldKey::MaxBrowserWorkers,
        FieldKey::MaxRenderWorkers,
        FieldKey::RemoteChromeUrl,
    ];

    /// Name used in the host's `jsonData` object
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AppUrl => "appURL",
            Self::TlsSkipVerify => "tlsSkipVerify",
            Self::Orientation => "orientation",
            Self::Layout => "layout",
            Self::DashboardMode => "dashboardMode",
            Self::TimeZone => "timeZone",
            Self::Logo => "logo",
            Self::MaxBrowserWorkers => "maxBrowserWorkers",
            Self::MaxRenderWorkers => "maxRenderWorkers",
            Self::RemoteChromeUrl => "remoteChromeURL",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::AppUrl => "Grafana Hostname",
            Self::TlsSkipVerify => "Skip TLS Verification",
            Self::Orientation => "Report Orientation",
            Self::Layout => "Layout",
            Self::DashboardMode => "Dashboard Mode",
            Self::TimeZone => "Time Zone",
            Self::Logo => "Branding Logo",
            Self::MaxBrowserWorkers => "Maximum Browser Workers",
            Self::MaxRenderWorkers => "Maximum Render Workers",
            Self::RemoteChromeUrl => "Remote Chrome Addr",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::AppUrl | Self::TimeZone | Self::Logo | Self::RemoteChromeUrl => FieldKind::Text,
            Self::TlsSkipVerify => FieldKind::Flag,
            Self::Orientation | Self::Layout | Self::DashboardMode => FieldKind::Choice,
            Self::MaxBrowserWorkers | Self::MaxRenderWorkers => FieldKind::Number,
        }
    }

    /// Allowed values for choice fields (empty for other kinds)
    pub fn options(&self) -> &'static [&'static str] {
        match self {
            Self::Orientation => ORIENTATION_OPTIONS,
            Self::Layout => LAYOUT_OPTIONS,
            Self::DashboardMode => DASHBOARD_MODE_OPTIONS,
            _ => &[],
        }
    }

    /// Value used when the stored configuration omits this key
    pub fn default_value(&self) -> FieldValue {
        match self {
            Self::AppUrl | Self::TimeZone | Self::Logo | Self::RemoteChromeUrl => {
                FieldValue::Text(String::new())
            }
            Self::TlsSkipVerify => FieldValue::Flag(false),
            Self::Orientation => FieldValue::Choice("portrait".to_string()),
            Self::Layout => FieldValue::Choice("simple".to_string()),
            Self::DashboardMode => FieldValue::Choice("default".to_string()),
            Self::MaxBrowserWorkers | Self::MaxRenderWorkers => FieldValue::Number(2),
        }
    }

    /// Short description of accepted input, used in error messages
    pub fn expected(&self) -> &'static str {
        match self {
            Self::Orientation => "portrait|landscape",
            Self::Layout => "simple|grid",
            Self::DashboardMode => "default|full",
            _ => self.kind().name(),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FieldKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::unknown_field(s))
    }
}

/// Declared type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Flag,
    Number,
    Choice,
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Flag => "boolean",
            Self::Number => "integer",
            Self::Choice => "choice",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Field values
// ─────────────────────────────────────────────────────────────────────────────

/// A typed setting value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Number(i64),
    Choice(String),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Flag(_) => FieldKind::Flag,
            Self::Number(_) => FieldKind::Number,
            Self::Choice(_) => FieldKind::Choice,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Self::Text(s) | Self::Choice(s) => s.clone(),
            Self::Flag(b) => b.to_string(),
            Self::Number(n) => n.to_string(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(s) | Self::Choice(s) => Value::String(s.clone()),
            Self::Flag(b) => Value::Bool(*b),
            Self::Number(n) => Value::from(*n),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Choice(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// True for text-like values with no content
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) | Self::Choice(s) if s.is_empty())
    }

    /// Coerce a stored JSON value to the declared type of `key`.
    ///
    /// Returns `None` when the value is absent-equivalent or malformed, in
    /// which case the caller falls back to the key's default. Empty strings
    /// and a zero worker count count as absent.
    pub fn coerce(key: FieldKey, raw: &Value) -> Option<FieldValue> {
        match key.kind() {
            FieldKind::Text => match raw {
                Value::String(s) if !s.is_empty() => Some(Self::Text(s.clone())),
                _ => None,
            },
            FieldKind::Flag => match raw {
                Value::Bool(b) => Some(Self::Flag(*b)),
                Value::String(s) => parse_flag(s).map(Self::Flag),
                _ => None,
            },
            FieldKind::Number => {
                let n = match raw {
                    Value::Number(n) => n.as_i64().or_else(|| {
                        n.as_f64()
                            .filter(|f| f.fract() == 0.0 && f.is_finite())
                            .map(|f| f as i64)
                    }),
                    Value::String(s) => s.trim().parse::<i64>().ok(),
                    _ => None,
                };
                n.filter(|n| *n != 0).map(Self::Number)
            }
            FieldKind::Choice => match raw {
                Value::String(s) if key.options().contains(&s.as_str()) => {
                    Some(Self::Choice(s.clone()))
                }
                _ => None,
            },
        }
    }

    /// Parse operator input (e.g. the `VALUE` in `KEY=VALUE`) for `key`.
    pub fn parse_input(key: FieldKey, input: &str) -> Result<FieldValue> {
        match key.kind() {
            FieldKind::Text => Ok(Self::Text(input.to_string())),
            FieldKind::Flag => parse_flag(input)
                .map(Self::Flag)
                .ok_or_else(|| Error::field_type(key.as_str(), key.expected(), input)),
            FieldKind::Number => input
                .trim()
                .parse::<i64>()
                .map(Self::Number)
                .map_err(|_| Error::field_type(key.as_str(), key.expected(), input)),
            FieldKind::Choice => {
                let normalized = input.trim().to_ascii_lowercase();
                if key.options().contains(&normalized.as_str()) {
                    Ok(Self::Choice(normalized))
                } else {
                    Err(Error::field_type(key.as_str(), key.expected(), input))
                }
            }
        }
    }

    /// Conform an edited value to the declared type of `key`.
    ///
    /// Values of the right kind pass through; text is parsed as operator
    /// input; anything else is rejected.
    pub fn conform(key: FieldKey, value: FieldValue) -> Result<FieldValue> {
        match (key.kind(), value) {
            (FieldKind::Text, v @ FieldValue::Text(_)) => Ok(v),
            (FieldKind::Flag, v @ FieldValue::Flag(_)) => Ok(v),
            (FieldKind::Number, v @ FieldValue::Number(_)) => Ok(v),
            (FieldKind::Choice, FieldValue::Choice(s)) | (_, FieldValue::Text(s)) => {
                Self::parse_input(key, &s)
            }
            (_, other) => Err(Error::field_type(
                key.as_str(),
                key.expected(),
                other.display(),
            )),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Host-side state
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle flags owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnablementState {
    pub enabled: bool,
    pub pinned: bool,
}

impl EnablementState {
    pub fn new(enabled: bool, pinned: bool) -> Self {
        Self { enabled, pinned }
    }
}

/// Plugin settings as read back from the host.
///
/// The secret value itself is never returned, only whether one is stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub pinned: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub json_data: PartialConfig,

    #[serde(default, deserialize_with = "null_as_default")]
    pub secure_json_fields: BTreeMap<String, bool>,
}

impl StoredSettings {
    pub fn enablement(&self) -> EnablementState {
        EnablementState::new(self.enabled, self.pinned)
    }

    /// Whether the host already holds a secret token for this plugin
    pub fn secret_present(&self) -> bool {
        self.secure_json_fields
            .get(SECRET_TOKEN_KEY)
            .copied()
            .unwrap_or(false)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ─────────────────────────────────────────────────────────────────────────────
// Update payload
// ─────────────────────────────────────────────────────────────────────────────

/// Full replacement for the plugin's `jsonData` object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonData {
    #[serde(rename = "appURL")]
    pub app_url: String,
    pub tls_skip_verify: bool,
    pub orientation: String,
    pub layout: String,
    pub dashboard_mode: String,
    pub time_zone: String,
    pub logo: String,
    pub max_browser_workers: i64,
    pub max_render_workers: i64,
    #[serde(rename = "remoteChromeURL")]
    pub remote_chrome_url: String,
}

impl JsonData {
    /// Convert into the untyped map the host stores
    pub fn to_map(&self) -> Result<PartialConfig> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::host_response(format!(
                "jsonData serialized to a non-object: {}",
                other
            ))),
        }
    }
}

/// Write-only secret fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecureJsonData {
    #[serde(rename = "secretToken")]
    pub secret_token: String,
}

/// Body of a single settings-update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSettingsUpdate {
    pub enabled: bool,
    pub pinned: bool,
    pub json_data: JsonData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_json_data: Option<SecureJsonData>,
}
