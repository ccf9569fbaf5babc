//! Gateway assembly.
//!
//! Builds every component explicitly and wires them together; there are
//! no module-level singletons, so tests can stand up as many independent
//! gateways as they need.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::admin::AdminControl;
use crate::config::GatewayConfig;
use crate::dispatch::FailoverDispatcher;
use crate::health::HealthProbe;
use crate::http::HttpServer;
use crate::provider::HttpProvider;
use crate::resilience::{BreakerConfig, CircuitBreaker, TracingObserver};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid provider URL: {0}")]
    InvalidProviderUrl(#[from] url::ParseError),
}

/// Build a fully wired HTTP server from validated configuration.
pub fn build_gateway(config: GatewayConfig) -> Result<HttpServer, StartupError> {
    let primary: Arc<HttpProvider> = Arc::new(HttpProvider::from_config(&config.providers.primary)?);
    let secondary = Arc::new(HttpProvider::from_config(&config.providers.secondary)?);

    let breaker = Arc::new(CircuitBreaker::new(
        config.providers.primary.name.clone(),
        BreakerConfig::from(&config.breaker),
        Arc::new(TracingObserver),
    ));

    let dispatcher = Arc::new(FailoverDispatcher::new(
        primary.clone(),
        secondary,
        breaker.clone(),
    ));

    let probe = HealthProbe::new(primary, Duration::from_secs(config.probe.timeout_secs));
    let admin = Arc::new(AdminControl::new(breaker, probe, dispatcher.clone()));

    Ok(HttpServer::new(config, dispatcher, admin))
}
