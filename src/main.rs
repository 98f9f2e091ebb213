// ABOUTME: Main entry point for the interactive terminal bridge client

use anyhow::Result;
use bridge_client::bridge::BridgeClient;
use bridge_client::config::ClientConfig;
use bridge_client::console::{render, spawn_event_printer, Console};
use bridge_client::logging;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{error, info};

/// Interactive client for the terminal bridge WebSocket service
#[derive(Parser, Debug)]
#[command(name = "bridge-client", version, about)]
struct Cli {
    /// Bridge endpoint, overriding the config file
    #[arg(long)]
    url: Option<String>,

    /// Config file to use instead of ~/.bridge-client/config.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ClientConfig::load_from(path),
        None => ClientConfig::load(),
    };
    let config = match config {
        Ok(config) => config.with_url(cli.url),
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    match logging::init(&config) {
        Ok(path) => info!("Logging to {}", path.display()),
        Err(e) => eprintln!("⚠️  File logging disabled: {e:#}"),
    }

    println!("🔌 Connecting to {}...", config.url);
    let (client, events) = match BridgeClient::connect(&config.url).await {
        Ok(connected) => connected,
        Err(e) => {
            error!("Initial connection failed: {}", e);
            for line in render::connection_failure_lines(&e, &config.url) {
                println!("{line}");
            }
            std::process::exit(1);
        }
    };
    println!("✅ Connected to the terminal bridge!");

    let client = Arc::new(client);
    let printer = spawn_event_printer(events);

    let mut console = Console::new(
        client.clone(),
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    );

    tokio::select! {
        result = console.run() => {
            if let Err(e) = result {
                error!("Console loop failed: {:#}", e);
                eprintln!("Error: {e:#}");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
            println!("\n\n👋 Goodbye!");
        }
    }

    client.disconnect().await;
    printer.abort();
    info!("Client shut down");

    // stdin is read on a blocking thread that cannot be cancelled
    std::process::exit(0);
}
