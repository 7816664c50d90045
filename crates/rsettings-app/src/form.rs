//! Form state store
//!
//! Holds the in-progress edits of one editing session: the current value of
//! every setting, a parallel "changed" flag per setting, and the write-only
//! secret token. All transitions are pure and return a new [`FormState`];
//! nothing here knows about rendering or the host.

use std::collections::BTreeMap;

use rsettings_core::prelude::*;
use rsettings_core::{FieldKey, FieldValue, PartialConfig, StoredSettings};

/// One editable setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: FieldKey,
    /// Current value, always of the key's declared kind
    pub value: FieldValue,
    /// Set once the operator has edited this field in the session, even if
    /// the new value equals the old one
    pub changed: bool,
    pub default: FieldValue,
}

impl FieldSpec {
    pub fn is_default(&self) -> bool {
        self.value == self.default
    }
}

/// The secret token as seen from the client.
///
/// `configured` is true when the host already holds a secret that the
/// operator has not reset. `value` is never pre-populated from the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretField {
    pub value: String,
    pub configured: bool,
}

/// Every editable setting plus the secret token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    fields: BTreeMap<FieldKey, FieldSpec>,
    secret: SecretField,
}

impl FormState {
    /// Build the initial state of a session from the host's stored `jsonData`.
    ///
    /// Missing or malformed values fall back to the field's default; this
    /// never fails.
    pub fn initialize(stored: &PartialConfig, secret_present: bool) -> Self {
        let fields = FieldKey::ALL
            .into_iter()
            .map(|key| {
                let default = key.default_value();
                let value = match stored.get(key.as_str()) {
                    Some(raw) => FieldValue::coerce(key, raw).unwrap_or_else(|| {
                        debug!("Stored {} = {} not usable, defaulting to {:?}", key, raw, default);
                        default.clone()
                    }),
                    None => default.clone(),
                };
                let spec = FieldSpec {
                    key,
                    value,
                    changed: false,
                    default,
                };
                (key, spec)
            })
            .collect();

        Self {
            fields,
            secret: SecretField {
                value: String::new(),
                configured: secret_present,
            },
        }
    }

    pub fn from_stored(stored: &StoredSettings) -> Self {
        Self::initialize(&stored.json_data, stored.secret_present())
    }

    /// Set one field and mark it changed. Other fields are untouched.
    ///
    /// The value is coerced to the field's declared kind; a value that cannot
    /// be coerced is rejected and the state is left as it was.
    pub fn set_field(&self, key: FieldKey, value: FieldValue) -> Result<Self> {
        let value = FieldValue::conform(key, value)?;
        let mut next = self.clone();
        if let Some(field) = next.fields.get_mut(&key) {
            field.value = value;
            field.changed = true;
        }
        Ok(next)
    }

    /// Replace the typed secret (trimmed). Does not mark it configured.
    #[must_use]
    pub fn set_secret(&self, value: &str) -> Self {
        let mut next = self.clone();
        next.secret.value = value.trim().to_string();
        next
    }

    /// Forget the stored secret so the next save overwrites it
    #[must_use]
    pub fn reset_secret(&self) -> Self {
        let mut next = self.clone();
        next.secret = SecretField {
            value: String::new(),
            configured: false,
        };
        next
    }

    /// Whether a save would be meaningful.
    ///
    /// True when any field was edited, a secret has been typed, or one of the
    /// two URL fields has content (edited or not).
    pub fn can_save(&self) -> bool {
        self.fields.values().any(|f| f.changed)
            || !self.secret.value.is_empty()
            || !self.value(FieldKey::AppUrl).is_empty()
            || !self.value(FieldKey::RemoteChromeUrl).is_empty()
    }

    pub fn field(&self, key: FieldKey) -> &FieldSpec {
        &self.fields[&key]
    }

    pub fn value(&self, key: FieldKey) -> &FieldValue {
        &self.field(key).value
    }

    /// All fields in documented order
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.values()
    }

    pub fn changed_keys(&self) -> Vec<FieldKey> {
        self.fields
            .values()
            .filter(|f| f.changed)
            .map(|f| f.key)
            .collect()
    }

    pub fn secret(&self) -> &SecretField {
        &self.secret
    }

    /// Text value of `key`, or empty for non-text fields
    pub fn text(&self, key: FieldKey) -> String {
        self.value(key).as_str().unwrap_or_default().to_string()
    }

    pub fn flag(&self, key: FieldKey) -> bool {
        self.value(key).as_flag().unwrap_or_default()
    }

    pub fn number(&self, key: FieldKey) -> i64 {
        self.value(key)
            .as_number()
            .or_else(|| self.field(key).default.as_number())
            .unwrap_or_default()
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::initialize(&PartialConfig::new(), false)
    }
}
