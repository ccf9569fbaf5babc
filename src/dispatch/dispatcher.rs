//! Failover dispatcher.
//!
//! # Responsibilities
//! - Route one notification through the breaker-guarded primary
//! - Fall back to the unguarded secondary on rejection or failure
//! - Track which provider handled the most recent successful send

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::provider::{DeliveryReceipt, Notification, Provider, ProviderError};
use crate::resilience::{CircuitBreaker, GuardError};

/// Which provider handled the most recent successful send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveProvider {
    Primary,
    Secondary,
}

impl std::fmt::Display for ActiveProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActiveProvider::Primary => write!(f, "primary"),
            ActiveProvider::Secondary => write!(f, "secondary"),
        }
    }
}

/// Outcome of a successful send.
#[derive(Debug)]
pub struct Dispatch {
    pub provider: ActiveProvider,
    pub receipt: DeliveryReceipt,
}

/// The single hard failure mode of `send`: both providers failed for one
/// logical notification.
#[derive(Debug, Error)]
#[error("all providers failed: primary: {primary}; secondary: {secondary}")]
pub struct AllProvidersFailed {
    pub primary: GuardError,
    pub secondary: ProviderError,
}

/// Routes notifications to the primary provider through its circuit
/// breaker and falls over to the secondary when the primary is rejected
/// or fails.
pub struct FailoverDispatcher {
    primary: Arc<dyn Provider>,
    secondary: Arc<dyn Provider>,
    breaker: Arc<CircuitBreaker>,
    active_provider: RwLock<ActiveProvider>,
}

impl FailoverDispatcher {
    pub fn new(
        primary: Arc<dyn Provider>,
        secondary: Arc<dyn Provider>,
        breaker: Arc<CircuitBreaker>,
    ) -> Self {
        Self {
            primary,
            secondary,
            breaker,
            active_provider: RwLock::new(ActiveProvider::Primary),
        }
    }

    /// Deliver one notification.
    ///
    /// Invokes the primary at most once (through the breaker) and the
    /// secondary at most once; never retries internally.
    pub async fn send(&self, notification: &Notification) -> Result<Dispatch, AllProvidersFailed> {
        let primary_error = match self
            .breaker
            .guard(|| self.primary.attempt(notification))
            .await
        {
            Ok(receipt) => {
                *self.active_provider.write().await = ActiveProvider::Primary;
                return Ok(Dispatch {
                    provider: ActiveProvider::Primary,
                    receipt,
                });
            }
            Err(e @ GuardError::BreakerOpen { .. }) => {
                tracing::warn!(
                    primary = self.primary.name(),
                    secondary = self.secondary.name(),
                    "Circuit is open, routing directly to the secondary provider"
                );
                e
            }
            Err(e) => {
                tracing::error!(
                    primary = self.primary.name(),
                    error = %e,
                    "Primary provider failed, falling back to the secondary"
                );
                e
            }
        };

        match self.secondary.attempt(notification).await {
            Ok(receipt) => {
                *self.active_provider.write().await = ActiveProvider::Secondary;
                Ok(Dispatch {
                    provider: ActiveProvider::Secondary,
                    receipt,
                })
            }
            Err(secondary) => {
                tracing::error!(
                    secondary = self.secondary.name(),
                    error = %secondary,
                    "Secondary provider failed as well"
                );
                Err(AllProvidersFailed {
                    primary: primary_error,
                    secondary,
                })
            }
        }
    }

    pub async fn active_provider(&self) -> ActiveProvider {
        *self.active_provider.read().await
    }

    /// Used by the admin reset path after a successful health probe.
    pub async fn set_active_provider(&self, provider: ActiveProvider) {
        *self.active_provider.write().await = provider;
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }
}
