//! rsettings-host - Host settings API boundary for reporter-settings
//!
//! Provides the [`HostSettings`] read/replace interface, the [`Reloader`]
//! trigger, and a Grafana HTTP client implementing them. An in-memory host is
//! available to tests through the `test-helpers` feature.

pub mod grafana;
pub mod settings;

#[cfg(any(test, feature = "test-helpers"))]
pub mod memory;

pub use grafana::{GrafanaHost, DEFAULT_TIMEOUT};
pub use settings::{HostSettings, LocalHostSettings, Reloader};

#[cfg(any(test, feature = "test-helpers"))]
pub use memory::InMemoryHost;
