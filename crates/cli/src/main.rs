mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use std::{
    fs::{self, OpenOptions},
    io,
    path::Path,
};

use tracing_subscriber::{prelude::*, EnvFilter};
use subway_core::{
    config::{self, SubwayConfig},
    SnapshotStore, Subway,
};

use crate::{cli::Cli, commands::Outcome};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = SubwayConfig::load()?;
    init_logging(&config.log_path())?;
    if let Some(path) = config::ensure_default_config()? {
        tracing::info!("wrote default config to {}", path.display());
    }

    let store = SnapshotStore::new(config.snapshot_path());
    let subway = Subway::from_snapshot(store.load()?)
        .with_context(|| format!("failed to restore {}", store.path().display()))?;

    let stdout = io::stdout();
    let outcome = commands::execute(&subway, cli.command, &mut stdout.lock())?;
    if outcome == Outcome::Changed {
        store.save(&mut subway.snapshot())?;
        tracing::debug!("saved network to {}", store.path().display());
    }
    Ok(())
}

fn init_logging(log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let log_path = log_path.to_path_buf();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
