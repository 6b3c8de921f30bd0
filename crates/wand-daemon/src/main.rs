//! Wand Daemon - Main entry point
//!
//! Runs the controller fleet manager and serves frames and events to
//! network clients.

mod api;
mod config;
mod server;
mod service;
mod state;
mod ws;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use wand_hid::{HidTransport, Transport};

use crate::service::FleetService;
use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "wandd")]
#[command(about = "Motion controller fleet daemon")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "wandd.toml")]
    config: PathBuf,

    /// Bind address for the web server
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Run a single enumeration pass, print attached controllers, and exit
    #[arg(long)]
    list_devices: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("wandd v{}", env!("CARGO_PKG_VERSION"));

    if args.list_devices {
        return list_devices();
    }

    // Load configuration
    let mut config = config::load_config(&args.config);

    // Override bind address if specified
    if let Some(bind) = args.bind {
        config.daemon.bind = bind;
    }

    // Bring up the fleet on its own thread; a transport failure is fatal
    let (frames, _) = broadcast::channel(256);
    let (mut fleet, commands, events) = FleetService::start(
        PathBuf::from(&config.daemon.fleet_config),
        frames.clone(),
    )?;

    let state = Arc::new(AppState {
        frames,
        events,
        commands,
    });

    // Serve until a shutdown signal or a bind failure, then stop the
    // fleet either way so open controllers are closed cleanly
    let result = server::run(state, &config.daemon.bind).await;
    fleet.stop();

    result
}

/// One enumeration pass over attached controllers, for diagnostics
fn list_devices() -> Result<()> {
    let mut transport = HidTransport::new();
    transport.initialize()?;
    let descriptors = transport.enumerate()?;

    println!("Found {} controller(s):", descriptors.len());
    for descriptor in &descriptors {
        print!(
            "  - {} ({:04x}:{:04x})",
            descriptor.path, descriptor.vendor_id, descriptor.product_id
        );
        if let Some(serial) = &descriptor.serial {
            print!(" serial {}", serial);
        }
        println!();
    }

    transport.shutdown();
    Ok(())
}
