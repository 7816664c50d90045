//! rsettings - edit the dashboard reporter plugin's settings
//!
//! This is the binary entry point. All logic lives in the library.

use std::sync::Arc;

use clap::Parser;
use reporter_settings::cli::{Args, CliCommand};
use reporter_settings::{run, Outcome};
use rsettings_app::config::{default_config_path, init_config_file, load_settings_with_env};
use rsettings_app::Engine;
use rsettings_core::prelude::*;
use rsettings_host::GrafanaHost;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    color_eyre::install().map_err(|e| Error::config(e.to_string()))?;
    rsettings_core::logging::init()?;

    if args.command == CliCommand::InitConfig {
        let path = args
            .config
            .or_else(default_config_path)
            .ok_or_else(|| Error::config("No config directory on this platform; pass --config"))?;
        init_config_file(&path).context("init-config")?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let mut settings = load_settings_with_env(args.config.as_deref());
    if let Some(url) = args.url {
        settings.host.url = url;
    }
    if let Some(plugin_id) = args.plugin_id {
        settings.host.plugin_id = plugin_id;
    }

    let Some(command) = args.command.into_command()? else {
        return Ok(());
    };

    info!(
        "rsettings starting against {} for {}",
        settings.host.url, settings.host.plugin_id
    );

    let host = GrafanaHost::new(
        &settings.host.url,
        settings.host.token.clone(),
        settings.host.timeout(),
    )
    .with_context(|| format!("Invalid host configuration for {}", settings.host.url))?;
    let mut engine = Engine::new(Arc::new(host), settings.host.plugin_id.clone());

    let mut stdout = std::io::stdout().lock();
    let outcome = run(&mut engine, command, &mut stdout).await?;

    let code = match outcome {
        Outcome::SaveFailed(message) => {
            eprintln!("Save failed, nothing was changed: {}", message);
            1
        }
        Outcome::SessionFailed(message) => {
            eprintln!("{}", message);
            2
        }
        _ => return Ok(()),
    };
    if let Ok(log_file) = rsettings_core::logging::get_current_log_file() {
        eprintln!("Details are logged under {}", log_file.display());
    }
    std::process::exit(code);
}
