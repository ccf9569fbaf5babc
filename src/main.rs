//! Notification Gateway
//!
//! An HTTP gateway that dispatches notifications to a primary provider
//! guarded by a circuit breaker and falls over to a secondary provider
//! under sustained failure.
//!
//! ```text
//!                        ┌──────────────────────────────────────────┐
//!                        │            NOTIFICATION GATEWAY          │
//!     POST /notifications│  ┌────────┐   ┌────────────────────────┐ │
//!     ───────────────────┼─▶│  http  │──▶│   FailoverDispatcher   │ │
//!                        │  │ server │   │  ┌──────────────────┐  │ │   primary
//!                        │  └────────┘   │  │  CircuitBreaker  │──┼─┼──▶ provider
//!                        │               │  └──────────────────┘  │ │
//!                        │               │       fallback ────────┼─┼──▶ secondary
//!                        │               └────────────────────────┘ │   provider
//!                        │  ┌──────────────────────────────────────┐│
//!                        │  │  admin: probe-gated reset, status    ││
//!                        │  └──────────────────────────────────────┘│
//!                        └──────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notify_gateway::config::load_or_default;
use notify_gateway::lifecycle::build_gateway;
use notify_gateway::observability::metrics;
use notify_gateway::Shutdown;

#[derive(Parser)]
#[command(name = "notify-gateway", version, about = "Notification failover gateway")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notify_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("notify-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    let config = load_or_default(cli.config)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        primary = %config.providers.primary.name,
        secondary = %config.providers.secondary.name,
        failure_threshold = config.breaker.failure_threshold,
        reset_timeout_secs = config.breaker.reset_timeout_secs,
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

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.listen_for_ctrl_c();

    let server = build_gateway(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
