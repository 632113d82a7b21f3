//! HTTP uptime monitor (v1)
//!
//! Periodically probes a fixed list of HTTP endpoints, retries transport
//! failures with a fixed delay, records every attempt in an append-only event
//! log, and keeps per-endpoint up/down/failed counts.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                         UPTIME MONITOR                           │
//!   │                                                                  │
//!   │  ┌──────────┐   ┌───────────┐   ┌────────────┐                   │
//!   │  │ registry │──▶│  session  │──▶│   probe    │──▶ HTTP GET ──────┼──▶ Endpoint
//!   │  │(static)  │   │  runner   │   │  executor  │◀── status/error ◀─┼───
//!   │  └──────────┘   └─────┬─────┘   └─────┬──────┘                   │
//!   │        ▲              │               │ attempts                 │
//!   │        │              ▼               ▼                          │
//!   │  ┌─────┴────┐   ┌───────────┐   ┌────────────┐                   │
//!   │  │  config  │   │ aggregate │   │    sink    │──▶ api_uptime.log │
//!   │  └──────────┘   └─────┬─────┘   └────────────┘                   │
//!   │                       ▼                                          │
//!   │                 ┌───────────┐   ┌────────────────────────────┐   │
//!   │                 │   admin   │   │ lifecycle / observability  │   │
//!   │                 │    API    │   │ scheduler, signals, metrics│   │
//!   │                 └───────────┘   └────────────────────────────┘   │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use clap::Parser;

use uptime_monitor::config::load_config;
use uptime_monitor::lifecycle::signals::spawn_signal_listener;
use uptime_monitor::lifecycle::{Services, Shutdown};
use uptime_monitor::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "uptime-monitor")]
#[command(about = "Periodically probe HTTP endpoints and record their availability", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "monitor.toml")]
    config: PathBuf,

    /// Run a single cycle and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_config(&args.config)?;
    if args.once {
        config.schedule.max_cycles = 1;
    }

    init_logging(&config.observability);
    tracing::info!("uptime-monitor v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        path = %args.config.display(),
        endpoints = config.endpoints.len(),
        interval_secs = config.schedule.interval_secs,
        "Configuration loaded"
    );

    let services = Services::build(config).await?;

    let shutdown = Arc::new(Shutdown::new());
    spawn_signal_listener(shutdown.clone());

    services.run(shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
