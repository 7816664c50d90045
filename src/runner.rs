//! One-shot runner: load a session, apply a command, report the result
//!
//! The runner drives an [`Engine`] the way an operator would drive the
//! settings page: edits first, then a single save or enable/disable, then
//! waiting for the forced reload.

use std::io::Write;
use std::str::FromStr;

use rsettings_app::{AppState, Engine, Message};
use rsettings_core::prelude::*;
use rsettings_core::{FieldKey, FieldValue};
use rsettings_host::HostSettings;

/// What the operator asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Set(Edits),
    Enable,
    Disable,
}

/// Edits applied before a save
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Edits {
    pub fields: Vec<(FieldKey, FieldValue)>,
    pub secret: Option<String>,
    pub reset_secret: bool,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Settings were printed
    Shown,
    /// Settings were written and the session reloaded
    Saved,
    /// The edits left nothing the save control would submit
    NothingToSave,
    /// The plugin was already in the requested state
    Unchanged,
    /// The host rejected the save; the edits were not applied
    SaveFailed(String),
    /// The session cannot continue
    SessionFailed(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::SaveFailed(_) | Outcome::SessionFailed(_))
    }
}

/// Parse a `KEY=VALUE` assignment against the setting's declared type
pub fn parse_assignment(input: &str) -> Result<(FieldKey, FieldValue)> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| Error::config(format!("Expected KEY=VALUE, got {:?}", input)))?;
    let key = FieldKey::from_str(key.trim())?;
    let value = FieldValue::parse_input(key, value)?;
    Ok((key, value))
}

pub fn parse_assignments<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<(FieldKey, FieldValue)>> {
    inputs.iter().map(|s| parse_assignment(s.as_ref())).collect()
}

/// Load the session and run `command` against it
pub async fn run<H, W>(engine: &mut Engine<H>, command: Command, out: &mut W) -> Result<Outcome>
where
    H: HostSettings + Send + Sync + 'static,
    W: Write,
{
    if let Err(e) = engine.start().await {
        warn!("Initial load failed: {}", e);
        return Ok(session_failed(&engine.state));
    }

    match command {
        Command::Show => {
            render(&engine.state, out)?;
            Ok(Outcome::Shown)
        }
        Command::Set(edits) => apply_and_save(engine, edits, out).await,
        Command::Enable => toggle(engine, true, out).await,
        Command::Disable => toggle(engine, false, out).await,
    }
}

async fn apply_and_save<H, W>(engine: &mut Engine<H>, edits: Edits, out: &mut W) -> Result<Outcome>
where
    H: HostSettings + Send + Sync + 'static,
    W: Write,
{
    for (key, value) in edits.fields {
        engine.dispatch(Message::SetField { key, value });
        if let Some(message) = engine.state.last_error.take() {
            return Err(Error::config_invalid(message));
        }
    }
    if edits.reset_secret {
        engine.dispatch(Message::ResetSecret);
    }
    if let Some(secret) = edits.secret {
        engine.dispatch(Message::SetSecret(secret));
    }

    let secret = engine.state.form.secret();
    if secret.configured && !secret.value.is_empty() {
        writeln!(
            out,
            "Note: a token is already stored and will be kept; pass --reset-secret to replace it"
        )?;
    }

    if !engine.state.can_submit() {
        writeln!(out, "Nothing to save")?;
        return Ok(Outcome::NothingToSave);
    }

    engine.dispatch(Message::Save);
    engine.run_until_idle().await;
    finish(&engine.state, out)
}

async fn toggle<H, W>(engine: &mut Engine<H>, enabled: bool, out: &mut W) -> Result<Outcome>
where
    H: HostSettings + Send + Sync + 'static,
    W: Write,
{
    if engine.state.enablement.enabled == enabled {
        writeln!(
            out,
            "{} is already {}",
            engine.state.plugin_id,
            if enabled { "enabled" } else { "disabled" }
        )?;
        return Ok(Outcome::Unchanged);
    }

    engine.dispatch(if enabled {
        Message::Enable
    } else {
        Message::Disable
    });
    engine.run_until_idle().await;
    finish(&engine.state, out)
}

fn finish<W: Write>(state: &AppState, out: &mut W) -> Result<Outcome> {
    if state.is_failed() {
        return Ok(session_failed(state));
    }
    if let Some(message) = &state.last_error {
        return Ok(Outcome::SaveFailed(message.clone()));
    }
    writeln!(out, "Settings saved")?;
    render(state, out)?;
    Ok(Outcome::Saved)
}

fn session_failed(state: &AppState) -> Outcome {
    Outcome::SessionFailed(
        state
            .last_error
            .clone()
            .unwrap_or_else(|| "session failed".to_string()),
    )
}

/// Print the current session's settings
pub fn render<W: Write>(state: &AppState, out: &mut W) -> Result<()> {
    let enablement = &state.enablement;
    writeln!(
        out,
        "{} ({}{})",
        state.plugin_id,
        if enablement.enabled { "enabled" } else { "disabled" },
        if enablement.pinned { ", pinned" } else { "" }
    )?;
    if let Some(loaded_at) = state.loaded_at {
        writeln!(out, "Loaded {}", loaded_at.format("%Y-%m-%d %H:%M:%S"))?;
    }

    for field in state.form.fields() {
        let marker = if field.is_default() { " (default)" } else { "" };
        writeln!(
            out,
            "  {:<26} {:<18} {}{}",
            field.key.label(),
            field.key.as_str(),
            field.value,
            marker
        )?;
    }

    let secret = state.form.secret();
    let status = if secret.configured {
        "configured"
    } else if secret.value.is_empty() {
        "not configured"
    } else {
        "pending"
    };
    writeln!(
        out,
        "  {:<26} {:<18} {}",
        "Service Account Token",
        rsettings_core::SECRET_TOKEN_KEY,
        status
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment_typed() {
        assert_eq!(
            parse_assignment("maxRenderWorkers=4").unwrap(),
            (FieldKey::MaxRenderWorkers, FieldValue::Number(4))
        );
        assert_eq!(
            parse_assignment("tlsSkipVerify=yes").unwrap(),
            (FieldKey::TlsSkipVerify, FieldValue::Flag(true))
        );
        assert_eq!(
            parse_assignment("layout=Grid").unwrap(),
            (FieldKey::Layout, FieldValue::Choice("grid".into()))
        );
    }

    #[test]
    fn test_parse_assignment_keeps_equals_in_value() {
        let (key, value) = parse_assignment("appURL=http://host:3000/?a=b").unwrap();
        assert_eq!(key, FieldKey::AppUrl);
        assert_eq!(value, FieldValue::Text("http://host:3000/?a=b".into()));
    }

    #[test]
    fn test_parse_assignment_allows_clearing_text() {
        let (_, value) = parse_assignment("remoteChromeURL=").unwrap();
        assert_eq!(value, FieldValue::Text(String::new()));
    }

    #[test]
    fn test_parse_assignment_errors() {
        assert!(matches!(
            parse_assignment("nope=1"),
            Err(Error::UnknownField { .. })
        ));
        assert!(matches!(
            parse_assignment("maxBrowserWorkers=many"),
            Err(Error::FieldType { .. })
        ));
        assert!(matches!(parse_assignment("layout"), Err(Error::Config { .. })));
    }

    #[test]
    fn test_outcome_success() {
        assert!(Outcome::Saved.is_success());
        assert!(Outcome::NothingToSave.is_success());
        assert!(!Outcome::SaveFailed("x".into()).is_success());
    }
}
