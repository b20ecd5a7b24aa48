use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use infoblend_config::{Config, ProviderOverrides};
use infoblend_core::{LookupMessage, LookupService, ReqwestTransport};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

pub mod agent;
pub mod store;

#[cfg(test)]
mod tests;

use self::agent::{AgentHandle, serve_lines, spawn_agent};
use self::store::{JsonFileStore, settings_path};

#[derive(Parser, Debug)]
#[command(name = "infoblend", about = "Inline definition lookups", version)]
struct Cli {
    /// Provider settings file (JSON, settings page keys).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a word or phrase.
    Lookup {
        /// Selected text.
        text: String,
        /// Phrase candidate to try first, most specific first.
        #[arg(long = "candidate")]
        candidates: Vec<String>,
    },
    /// Send the diagnostic test query, optionally overriding stored settings.
    Test {
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        template: Option<String>,
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        api_key_header: Option<String>,
    },
    /// Answer line-delimited JSON messages from stdin on stdout.
    Serve,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = Config::new();
    let store = JsonFileStore::new(settings_path(cli.settings));
    tracing::info!("Reading settings from {}", store.path().display());

    let transport =
        ReqwestTransport::new(&config.network).context("Failed to build HTTP client")?;
    let service = Arc::new(LookupService::new(store, transport, config));

    // Shutdown on Ctrl+C
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown requested");
                cancel.cancel();
            }
        }
    });

    let (handle, agent) = spawn_agent(service, cancel.clone());

    match cli.command {
        Command::Lookup { text, candidates } => {
            print_response(&handle, LookupMessage::lookup(text, candidates)).await?;
        }
        Command::Test {
            provider,
            template,
            api_key,
            api_key_header,
        } => {
            let overrides = ProviderOverrides {
                provider,
                template,
                key: api_key,
                key_header: api_key_header,
            };
            print_response(&handle, LookupMessage::test(overrides)).await?;
        }
        Command::Serve => {
            serve_lines(
                handle,
                tokio::io::stdin(),
                tokio::io::stdout(),
                cancel.clone(),
            )
            .await?;
        }
    }

    cancel.cancel();
    if let Err(e) = agent.await {
        tracing::error!("Background agent panicked: {e}");
    }

    Ok(())
}

async fn print_response(handle: &AgentHandle, message: LookupMessage) -> anyhow::Result<()> {
    let response = handle.request(message).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
