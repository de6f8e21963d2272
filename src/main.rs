// src/main.rs — listing-relay entry point

use std::path::Path;
use std::sync::Arc;

use clap::Parser;

use listing_relay::api::{self, ApiState};
use listing_relay::core::dispatch::{Dispatcher, HttpTransport};
use listing_relay::core::ledger::SessionLedger;
use listing_relay::infra::config::Config;
use listing_relay::infra::logger;

#[derive(Parser)]
#[command(name = "listing-relay", version, about = "Deduplicating proxy for listing marketing-pack generation")]
struct Cli {
    /// Path to a TOML config file (defaults + environment otherwise)
    #[arg(long)]
    config: Option<String>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("info");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref().map(Path::new))?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    tracing::info!(
        webhook_url = %config.webhook.url,
        retention_secs = config.ledger.retention_seconds,
        stall_secs = config.ledger.stall_seconds,
        "starting listing-relay"
    );

    let ledger = Arc::new(SessionLedger::new(
        config.ledger.retention(),
        config.ledger.stall(),
    ));
    let transport = Arc::new(HttpTransport::new(&config.webhook));
    let dispatcher = Arc::new(Dispatcher::new(transport, config.webhook.max_attempts));

    let state = ApiState { ledger, dispatcher };
    api::start_server(config.server.port, state).await
}
