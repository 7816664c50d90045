//! Engine - owns the session state, the message channel and background tasks
//!
//! Messages go through [`update`]; the resulting actions are spawned as tokio
//! tasks whose results come back as messages. Only one save can be in flight
//! at a time because the state machine stops accepting input while saving.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use rsettings_core::prelude::*;
use rsettings_host::{HostSettings, Reloader};

use crate::handler::{update, UpdateAction};
use crate::message::Message;
use crate::persist::SettingsPersister;
use crate::state::AppState;

/// Capacity of the engine's message channel
const MESSAGE_CHANNEL_CAPACITY: usize = 64;

/// Reload trigger that restarts the session through the engine's channel
#[derive(Debug, Clone)]
pub struct SessionReloader {
    tx: mpsc::Sender<Message>,
}

impl SessionReloader {
    pub fn new(tx: mpsc::Sender<Message>) -> Self {
        Self { tx }
    }
}

impl Reloader for SessionReloader {
    fn reload(&self) -> Result<()> {
        self.tx.try_send(Message::Reload).map_err(|e| match e {
            TrySendError::Closed(_) => Error::ChannelClosed,
            TrySendError::Full(_) => Error::channel_send("message queue full"),
        })
    }
}

/// Orchestration engine for one plugin's editing session
pub struct Engine<H> {
    /// TEA application state (the Model)
    pub state: AppState,

    msg_tx: mpsc::Sender<Message>,
    msg_rx: mpsc::Receiver<Message>,

    host: Arc<H>,
    persister: Arc<SettingsPersister<H, SessionReloader>>,

    /// Background tasks whose completion message has not arrived yet
    in_flight: usize,
}

impl<H> Engine<H>
where
    H: HostSettings + Send + Sync + 'static,
{
    pub fn new(host: Arc<H>, plugin_id: impl Into<String>) -> Self {
        let plugin_id = plugin_id.into();
        let (msg_tx, msg_rx) = mpsc::channel(MESSAGE_CHANNEL_CAPACITY);
        let persister = Arc::new(SettingsPersister::new(
            Arc::clone(&host),
            SessionReloader::new(msg_tx.clone()),
            plugin_id.clone(),
        ));

        Self {
            state: AppState::new(plugin_id),
            msg_tx,
            msg_rx,
            host,
            persister,
            in_flight: 0,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight == 0
    }

    /// Load the first session from the host and wait for it.
    pub async fn start(&mut self) -> Result<()> {
        self.handle_action(UpdateAction::LoadSession);
        self.run_until_idle().await;

        if self.state.is_failed() {
            let message = self.state.last_error.clone().unwrap_or_default();
            return Err(Error::host_request(message));
        }
        Ok(())
    }

    /// Process one message and start the action it produces, if any
    pub fn dispatch(&mut self, msg: Message) {
        if msg.is_completion() {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
        let result = update(&mut self.state, msg);
        if let Some(action) = result.action {
            self.handle_action(action);
        }
    }

    /// Drain messages until no background task is left in flight
    pub async fn run_until_idle(&mut self) {
        loop {
            while let Ok(msg) = self.msg_rx.try_recv() {
                self.dispatch(msg);
            }
            if self.in_flight == 0 {
                break;
            }
            match self.msg_rx.recv().await {
                Some(msg) => self.dispatch(msg),
                None => break,
            }
        }
    }

    fn handle_action(&mut self, action: UpdateAction) {
        let tx = self.msg_tx.clone();
        self.in_flight += 1;

        match action {
            UpdateAction::SubmitSettings { form, enablement } => {
                let persister = Arc::clone(&self.persister);
                tokio::spawn(async move {
                    let result = persister.save(&form, enablement).await;
                    send_completion(&tx, save_outcome(result)).await;
                });
            }
            UpdateAction::ToggleEnabled { form, enabled } => {
                let persister = Arc::clone(&self.persister);
                tokio::spawn(async move {
                    let result = persister.set_enabled(&form, enabled).await;
                    send_completion(&tx, save_outcome(result)).await;
                });
            }
            UpdateAction::LoadSession => {
                let host = Arc::clone(&self.host);
                let plugin_id = self.state.plugin_id.clone();
                tokio::spawn(async move {
                    debug!("Loading settings for {}", plugin_id);
                    let msg = match host.read_settings(&plugin_id).await {
                        Ok(stored) => Message::SessionLoaded(stored),
                        Err(e) => Message::SessionLoadFailed(e.to_string()),
                    };
                    send_completion(&tx, msg).await;
                });
            }
        }
    }
}

fn save_outcome(result: Result<()>) -> Message {
    match result {
        Ok(()) => Message::SaveSucceeded,
        Err(e) => Message::SaveFailed {
            message: e.to_string(),
            fatal: e.is_fatal(),
        },
    }
}

async fn send_completion(tx: &mpsc::Sender<Message>, msg: Message) {
    if tx.send(msg).await.is_err() {
        warn!("Engine dropped before a task completion was delivered");
    }
}
