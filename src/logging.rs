// ABOUTME: File-based tracing setup so log lines never interleave with the interactive console

use crate::config::ClientConfig;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber writing to a timestamped file. Returns the file path.
pub fn init(config: &ClientConfig) -> Result<PathBuf> {
    let log_dir = config.resolved_log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("cannot create log directory {}", log_dir.display()))?;

    let log_file = log_dir.join(format!(
        "bridge-client-{}.log",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("cannot open log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .try_init()
        .context("tracing subscriber already installed")?;

    Ok(log_file)
}
