//! Breaker observability seam.
//!
//! # Responsibilities
//! - Report every state transition, failure and success
//! - Keep the breaker decoupled from any specific log/metrics sink

use crate::observability::metrics;
use crate::resilience::circuit_breaker::CircuitState;

/// Capability the breaker reports into.
///
/// All methods default to no-ops so observers only implement what they
/// care about.
pub trait BreakerObserver: Send + Sync {
    fn on_state_change(&self, breaker: &str, old: CircuitState, new: CircuitState) {
        let _ = (breaker, old, new);
    }

    fn on_failure(&self, breaker: &str, consecutive_failures: u32, remaining_before_open: u32) {
        let _ = (breaker, consecutive_failures, remaining_before_open);
    }

    fn on_success(&self, breaker: &str, previous_failures: u32) {
        let _ = (breaker, previous_failures);
    }
}

/// Observer that logs through tracing and keeps the breaker state gauge
/// current.
pub struct TracingObserver;

impl BreakerObserver for TracingObserver {
    fn on_state_change(&self, breaker: &str, old: CircuitState, new: CircuitState) {
        match new {
            CircuitState::Open => tracing::warn!(
                breaker,
                %old,
                %new,
                "Circuit opened: routing notifications to the secondary provider"
            ),
            CircuitState::HalfOpen => tracing::info!(
                breaker,
                %old,
                %new,
                "Circuit half-open: testing whether the primary recovered"
            ),
            CircuitState::Closed => tracing::info!(
                breaker,
                %old,
                %new,
                "Circuit closed: primary provider back in rotation"
            ),
        }
        metrics::record_breaker_state(new);
    }

    fn on_failure(&self, breaker: &str, consecutive_failures: u32, remaining_before_open: u32) {
        metrics::record_provider_failure(breaker);
        if remaining_before_open > 0 {
            tracing::warn!(
                breaker,
                consecutive_failures,
                remaining_before_open,
                "Provider failure recorded"
            );
        } else {
            tracing::error!(breaker, consecutive_failures, "Provider failure threshold reached");
        }
    }

    fn on_success(&self, breaker: &str, previous_failures: u32) {
        if previous_failures > 0 {
            tracing::info!(
                breaker,
                previous_failures,
                "Provider call succeeded after failures, counter reset"
            );
        } else {
            tracing::debug!(breaker, "Provider call succeeded");
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::RecordingObserver;
    use super::*;
    use crate::provider::ProviderError;
    use crate::resilience::circuit_breaker::{BreakerConfig, CircuitBreaker};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn observer_sees_trip_and_recovery() {
        let observer = Arc::new(RecordingObserver::default());
        let cb = CircuitBreaker::new(
            "primary",
            BreakerConfig {
                failure_threshold: 2,
                reset_timeout: Duration::from_millis(10),
            },
            observer.clone(),
        );

        for _ in 0..2 {
            let _ = cb
                .guard(|| async {
                    Err::<(), _>(ProviderError::Status {
                        provider: "primary".into(),
                        status: 503,
                    })
                })
                .await;
        }
        tokio::time::sleep(Duration::from_millis(30)).await;
        let _ = cb.guard(|| async { Ok(()) }).await;

        let transitions = observer.transitions.lock().unwrap().clone();
        assert_eq!(
            transitions,
            vec![
                (CircuitState::Closed, CircuitState::Open),
                (CircuitState::Open, CircuitState::HalfOpen),
                (CircuitState::HalfOpen, CircuitState::Closed),
            ]
        );
    }
}
