//! Command-line interface definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use rsettings_core::prelude::*;

use crate::runner::{parse_assignments, Command, Edits};

/// Edit the dashboard reporter plugin's settings on a Grafana host
#[derive(Parser, Debug)]
#[command(name = "rsettings")]
#[command(about = "Edit and persist dashboard reporter plugin settings", long_about = None)]
pub struct Args {
    /// Path to config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Grafana base URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Plugin whose settings are edited
    #[arg(long, global = true)]
    pub plugin_id: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Print the current settings
    Show,
    /// Edit settings and save them
    Set {
        /// Settings to change, as KEY=VALUE using the setting's wire name
        #[arg(value_name = "KEY=VALUE")]
        assignments: Vec<String>,

        /// New service account token
        #[arg(long)]
        secret: Option<String>,

        /// Forget the stored service account token
        #[arg(long)]
        reset_secret: bool,
    },
    /// Enable and pin the plugin
    Enable,
    /// Disable and unpin the plugin
    Disable,
    /// Write a default config file
    InitConfig,
}

impl CliCommand {
    /// Convert to a runner command. `None` for commands that never talk to the host.
    pub fn into_command(self) -> Result<Option<Command>> {
        let command = match self {
            CliCommand::Show => Command::Show,
            CliCommand::Set {
                assignments,
                secret,
                reset_secret,
            } => Command::Set(Edits {
                fields: parse_assignments(&assignments)?,
                secret,
                reset_secret,
            }),
            CliCommand::Enable => Command::Enable,
            CliCommand::Disable => Command::Disable,
            CliCommand::InitConfig => return Ok(None),
        };
        Ok(Some(command))
    }
}
