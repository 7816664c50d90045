//! reporter-settings library
//!
//! Command-line front end for editing the dashboard reporter plugin's
//! settings. The form state, persistence and session engine live in
//! `rsettings-app`; this crate parses operator input and drives them.

pub mod cli;
pub mod runner;

pub use runner::{run, Command, Edits, Outcome};
