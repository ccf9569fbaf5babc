//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_sends_total` (counter): sends by provider and outcome
//! - `gateway_send_duration_seconds` (histogram): send latency
//! - `gateway_provider_failures_total` (counter): recorded provider failures
//! - `gateway_breaker_state` (gauge): 0=closed, 1=open, 2=half-open
//!
//! # Design Decisions
//! - Low-overhead updates; callers never block on metrics
//! - Exporter failure is logged, never fatal

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::resilience::CircuitState;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one send attempt outcome.
pub fn record_send(provider: &str, outcome: &str, start: Instant) {
    metrics::counter!(
        "gateway_sends_total",
        "provider" => provider.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    metrics::histogram!("gateway_send_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a provider failure counted by the breaker.
pub fn record_provider_failure(provider: &str) {
    metrics::counter!(
        "gateway_provider_failures_total",
        "provider" => provider.to_string()
    )
    .increment(1);
}

/// Keep the breaker state gauge current.
pub fn record_breaker_state(state: CircuitState) {
    let value = match state {
        CircuitState::Closed => 0.0,
        CircuitState::Open => 1.0,
        CircuitState::HalfOpen => 2.0,
    };
    metrics::gauge!("gateway_breaker_state").set(value);
}
