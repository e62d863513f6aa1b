//! Landing Daemon
//!
//! Serves the built landing page and the waitlist API.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: 0.0.0.0:5000, ./build, encrypted CSV in ./data
//! landing-daemon
//!
//! # Custom port and JSON lines storage
//! landing-daemon --port 8080 --store jsonl
//!
//! # With verbose logging
//! RUST_LOG=debug landing-daemon
//! ```
//!
//! # Environment Variables
//!
//! - `LANDING_CONFIG`: config file path
//! - `PORT`, `LANDING_BIND`: listen address
//! - `LANDING_STATIC_DIR`: built landing page directory
//! - `LANDING_STORE`, `LANDING_DATA_DIR`: waitlist storage
//! - `LANDING_ENCRYPTION_KEY`: hex AES-256 key for the CSV store
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)
//!
//! # Signals
//!
//! - SIGTERM/SIGINT: Graceful shutdown (in-flight requests finish)

mod server;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use landing_core::{load_config, ConfigOverrides, StoreKind};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "landing-daemon", version, about = "Finantic landing page server")]
struct Args {
    /// Config file (default: $XDG_CONFIG_HOME/finantic/landing.toml)
    #[arg(short, long, env = "LANDING_CONFIG")]
    config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory of the built landing page
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Storage backend: csv, jsonl or memory
    #[arg(long)]
    store: Option<StoreKind>,

    /// Directory for store files and the key file
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind: self.bind.clone(),
            port: self.port,
            static_dir: self.static_dir.clone(),
            store: self.store,
            data_dir: self.data_dir.clone(),
            waitlist_url: None,
            encryption_key: None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("landing_daemon=info".parse()?)
                .add_directive("landing_core=info".parse()?),
        )
        .with_target(true)
        .init();

    let args = Args::parse();

    info!("Starting Landing Daemon");
    info!("PID: {}", std::process::id());

    let (mut config, source) =
        load_config(args.config.as_deref()).context("Failed to load configuration")?;
    ConfigOverrides::from_env()
        .merge(args.overrides())
        .apply(&mut config);
    info!(source = %source, store = %config.storage.kind, "Configuration loaded");

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    server::run(&config, cancel).await
}

/// Cancel `cancel` on Ctrl-C or SIGTERM
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        () = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }

    cancel.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_become_overrides() {
        let args = Args::parse_from([
            "landing-daemon",
            "--port",
            "8080",
            "--store",
            "jsonl",
            "--data-dir",
            "/srv/landing",
        ]);
        let overrides = args.overrides();
        assert_eq!(overrides.port, Some(8080));
        assert_eq!(overrides.store, Some(StoreKind::JsonLines));
        assert_eq!(overrides.data_dir, Some(PathBuf::from("/srv/landing")));
        assert_eq!(overrides.bind, None);
    }

    #[test]
    fn test_unknown_store_rejected() {
        let result = Args::try_parse_from(["landing-daemon", "--store", "dynamo"]);
        assert!(result.is_err());
    }
}
