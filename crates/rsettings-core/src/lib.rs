//! # rsettings-core - Core Domain Types
//!
//! Foundation crate for reporter-settings. Provides the setting keys and typed
//! values, host-side state, the settings-update payload, error handling and
//! logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`FieldKey`] - The ten editable settings, with wire names and defaults
//! - [`FieldValue`] - A typed setting value plus load-time and edit-time coercion
//! - [`EnablementState`] - Host-owned enabled/pinned flags
//! - [`StoredSettings`] - Settings as read back from the host
//! - [`PluginSettingsUpdate`] - Body of a settings-update request
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use rsettings_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout all reporter-settings crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use types::{
    EnablementState, FieldKey, FieldKind, FieldValue, JsonData, PartialConfig,
    PluginSettingsUpdate, SecureJsonData, StoredSettings, SECRET_TOKEN_KEY,
};
