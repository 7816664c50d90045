//! rsettings-app - Form state and persistence orchestration for reporter-settings
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the
//! settings editing session, the persistence orchestrator that writes settings
//! and forces a reload, the Engine that runs both against a host, and
//! configuration loading.

pub mod config;
pub mod engine;
pub mod form;
pub mod handler;
pub mod message;
pub mod payload;
pub mod persist;
pub mod state;

// Re-export primary types
pub use engine::{Engine, SessionReloader};
pub use form::{FieldSpec, FormState, SecretField};
pub use handler::{UpdateAction, UpdateResult};
pub use message::Message;
pub use persist::SettingsPersister;
pub use state::{AppState, SessionPhase};
