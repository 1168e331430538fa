//! Scout - MCP server registry explorer
//!
//! Usage:
//!   scout                          # Serve MCP tools over stdio (default)
//!   scout call search '{"query": "postgres"}'
//!   scout tools                    # List available operations

mod server;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scout_core::commands::{Operation, ScoutService};
use scout_core::settings::Settings;

#[derive(Parser)]
#[command(name = "scout")]
#[command(about = "MCP server registry explorer and installer", long_about = None)]
struct Cli {
    /// Settings file (defaults to <config dir>/scout/scout.toml)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Installed-server settings file to manage
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// URL of the registry document
    #[arg(long, global = true)]
    registry_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the MCP tools over stdio
    Serve,

    /// Run one operation and print its JSON result
    Call {
        /// Operation name (see `scout tools`)
        operation: String,
        /// Operation arguments as a JSON object
        #[arg(default_value = "{}")]
        args: String,
    },

    /// List the available operations
    Tools,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scout=info,scout_core=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let service = ScoutService::from_settings(&settings)?;
            server::serve(Arc::new(service)).await?;
        }
        Commands::Call { operation, args } => {
            let service = ScoutService::from_settings(&settings)?;
            let args: serde_json::Value =
                serde_json::from_str(&args).context("Arguments must be a JSON object")?;
            let payload = service.dispatch(&operation, args).await?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Commands::Tools => {
            for operation in Operation::ALL {
                println!("{}", operation.name());
            }
        }
    }

    Ok(())
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match cli.settings.clone().or_else(Settings::default_path) {
        Some(path) => Settings::load(&path)?,
        None => Settings::default(),
    };

    if let Some(config) = &cli.config {
        settings.config_path = Some(config.clone());
    }
    if let Some(url) = &cli.registry_url {
        settings.registry_url = url.clone();
    }
    settings.validate()?;

    Ok(settings)
}
