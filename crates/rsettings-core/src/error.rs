//! Application error types with rich context

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid configuration: {message}")]
    ConfigInvalid { message: String },

    // ─────────────────────────────────────────────────────────────
    // Host API Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Host request failed: {message}")]
    HostRequest { message: String },

    #[error("Host rejected request with status {status}: {body}")]
    HostStatus { status: u16, body: String },

    #[error("Unexpected host response: {message}")]
    HostResponse { message: String },

    // ─────────────────────────────────────────────────────────────
    // Persistence Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to save settings: {message}")]
    SaveTransport { message: String },

    #[error("Settings were saved but the reload could not be triggered: {message}")]
    SaveAppliedNoReload { message: String },

    // ─────────────────────────────────────────────────────────────
    // Form Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Unknown setting: {key}")]
    UnknownField { key: String },

    #[error("Invalid value for {key}: expected {expected}, got {got:?}")]
    FieldType {
        key: String,
        expected: &'static str,
        got: String,
    },

    // ─────────────────────────────────────────────────────────────
    // Channel/Communication Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Channel send error: {message}")]
    ChannelSend { message: String },

    #[error("Channel closed unexpectedly")]
    ChannelClosed,
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            message: message.into(),
        }
    }

    pub fn host_request(message: impl Into<String>) -> Self {
        Self::HostRequest {
            message: message.into(),
        }
    }

    pub fn host_status(status: u16, body: impl Into<String>) -> Self {
        Self::HostStatus {
            status,
            body: body.into(),
        }
    }

    pub fn host_response(message: impl Into<String>) -> Self {
        Self::HostResponse {
            message: message.into(),
        }
    }

    pub fn save_transport(message: impl Into<String>) -> Self {
        Self::SaveTransport {
            message: message.into(),
        }
    }

    pub fn save_applied_no_reload(message: impl Into<String>) -> Self {
        Self::SaveAppliedNoReload {
            message: message.into(),
        }
    }

    pub fn unknown_field(key: impl Into<String>) -> Self {
        Self::UnknownField { key: key.into() }
    }

    pub fn field_type(key: impl Into<String>, expected: &'static str, got: impl Into<String>) -> Self {
        Self::FieldType {
            key: key.into(),
            expected,
            got: got.into(),
        }
    }

    pub fn channel_send(message: impl Into<String>) -> Self {
        Self::ChannelSend {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    ///
    /// Recoverable errors leave the editing session intact: the operator can
    /// correct the input or retry the save.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::HostRequest { .. }
                | Error::HostStatus { .. }
                | Error::HostResponse { .. }
                | Error::SaveTransport { .. }
                | Error::UnknownField { .. }
                | Error::FieldType { .. }
        )
    }

    /// Check if this error ends the editing session
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::SaveAppliedNoReload { .. } | Error::ConfigInvalid { .. } | Error::ChannelClosed
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}
