//! Let's Make a Deal - command-line client
//!
//! Creates a game, plays the selection and reveal turns, then deletes it.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use lets_make_a_deal::{ClientConfig, ConsoleOperator, ScriptedOperator, TurnDriver};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing(&cli)?;

    let config = load_config(&cli)?;

    println!("Let's Make a Deal!");

    let outcome = match cli.choices.clone() {
        Some(choices) => {
            let operator = ScriptedOperator::new(choices).with_echo(true);
            TurnDriver::new(config, operator)?.run().await
        }
        None => TurnDriver::new(config, ConsoleOperator::stdio())?.run().await,
    };

    let snapshot = outcome.context("Game did not complete")?;
    info!(status = %snapshot.status(), "Done");
    Ok(())
}

/// Applies CLI overrides on top of the config file (or defaults).
#[instrument(skip(cli), fields(config_path = %cli.config.display()))]
fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::load_or_default(&cli.config)?;

    if let Some(root_url) = &cli.root_url {
        info!(root_url = %root_url, "Overriding game root");
        config = config.with_root_url(root_url.as_str());
    }
    if let Some(timeout) = cli.timeout {
        config = config.with_request_timeout_secs(timeout);
    }
    if cli.history {
        config = config.with_show_history(true);
    }

    // Fail on a bad root before anything touches the network.
    config.root()?;
    Ok(config)
}

/// Logs go to `--log-file` when given so they stay off the prompt.
fn initialize_tracing(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match &cli.log_file {
        Some(path) => {
            let log_file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}
