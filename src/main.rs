//! ghproxy: a forwarding proxy for GitHub resources.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ axum server ──▶ routing ──────────────▶ forwarder ──▶ GitHub
//!                (request id,    normalize               outbound fetch,
//!                 trace,         classify                size ceiling,
//!                 timeout)       access policy           redirect loop
//!                                mirror? ──▶ 302 jsDelivr
//!     Client ◀── streamed response ◀──────────────────────────┘
//! ```

mod cli;

use clap::{CommandFactory, Parser};
use tokio::net::TcpListener;

use ghproxy::config::{load_config, ProxyConfig};
use ghproxy::http::HttpServer;
use ghproxy::lifecycle::Shutdown;
use ghproxy::observability::{logging, metrics};

use crate::cli::{Cli, Commands, RunArgs};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Run(args)) => run(&cli, args).await,
        Some(Commands::Version) => {
            cli::print_version();
            Ok(())
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

async fn run(cli: &Cli, args: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    args.apply(&mut config);

    logging::init(&config.observability.log_level, cli.verbose);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "ghproxy starting");
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        jsdelivr = config.proxy.jsdelivr,
        config_file = ?cli.config,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Server starting on");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
