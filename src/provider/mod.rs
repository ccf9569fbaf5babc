//! Notification provider subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher
//!     → Provider::attempt (one delivery attempt, no retries)
//!     → client.rs (HTTP POST to the provider's notify endpoint)
//!     → DeliveryReceipt on success / ProviderError on failure
//!
//! Health probing:
//!     → Provider::check_liveness (GET the provider's health endpoint)
//!     → bool (transport errors collapse to false)
//! ```
//!
//! # Design Decisions
//! - Providers are stateless, shared collaborators (`Arc<dyn Provider>`)
//! - Every failure counts the same; no per-error-type classification
//! - Non-2xx responses are provider failures, same as transport errors

pub mod client;

pub use client::HttpProvider;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One outbound notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub customer_id: String,
}

/// What a provider reports back on a successful delivery.
///
/// Providers are loose about their response bodies; unknown or missing
/// fields are tolerated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub provider_message_id: Option<String>,
}

/// Failure modes of a single provider attempt.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider '{provider}' is unreachable: {reason}")]
    Transport { provider: String, reason: String },

    #[error("provider '{provider}' responded with status {status}")]
    Status { provider: String, status: u16 },

    #[error("provider '{provider}' timed out after {timeout:?}")]
    Timeout { provider: String, timeout: Duration },
}

/// Capability consumed by the dispatcher and the health probe.
///
/// Implemented over HTTP by [`HttpProvider`]; tests supply scripted
/// in-memory implementations.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable provider label used in logs, metrics and errors.
    fn name(&self) -> &str;

    /// Issue exactly one delivery attempt.
    async fn attempt(&self, notification: &Notification) -> Result<DeliveryReceipt, ProviderError>;

    /// Lightweight, side-effect-free liveness check.
    async fn check_liveness(&self) -> bool;
}
