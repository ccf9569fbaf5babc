//! HTTP provider client.
//!
//! # Responsibilities
//! - Issue one notify attempt against a remote provider
//! - Probe the provider's health endpoint
//! - Map transport errors, timeouts and non-2xx responses to ProviderError

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::time;
use url::Url;

use crate::config::ProviderConfig;
use crate::provider::{DeliveryReceipt, Notification, Provider, ProviderError};

/// A remote notification provider reached over HTTP.
pub struct HttpProvider {
    name: String,
    notify_url: Url,
    health_url: Url,
    timeout: Duration,
    client: Client<HttpConnector, Body>,
}

impl HttpProvider {
    /// Build a provider client from configuration.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, url::ParseError> {
        let base = Url::parse(&config.base_url)?;
        let notify_url = base.join(&config.notify_path)?;
        let health_url = base.join(&config.health_path)?;

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self {
            name: config.name.clone(),
            notify_url,
            health_url,
            timeout: Duration::from_secs(config.timeout_secs),
            client,
        })
    }

    fn transport_error(&self, reason: impl std::fmt::Display) -> ProviderError {
        ProviderError::Transport {
            provider: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl Provider for HttpProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn attempt(&self, notification: &Notification) -> Result<DeliveryReceipt, ProviderError> {
        let payload = serde_json::to_vec(notification).map_err(|e| self.transport_error(e))?;

        let request = Request::builder()
            .method(Method::POST)
            .uri(self.notify_url.as_str())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload))
            .map_err(|e| self.transport_error(e))?;

        let response = match time::timeout(self.timeout, self.client.request(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(self.transport_error(e)),
            Err(_) => {
                return Err(ProviderError::Timeout {
                    provider: self.name.clone(),
                    timeout: self.timeout,
                })
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: self.name.clone(),
                status: status.as_u16(),
            });
        }

        // A 2xx is a delivery; the receipt body is best-effort.
        let body = axum::body::to_bytes(Body::new(response.into_body()), 64 * 1024)
            .await
            .map_err(|e| self.transport_error(e))?;

        Ok(serde_json::from_slice(&body).unwrap_or_default())
    }

    async fn check_liveness(&self) -> bool {
        let request = match Request::builder()
            .method(Method::GET)
            .uri(self.health_url.as_str())
            .header("user-agent", "notify-gateway-health-check")
            .body(Body::empty())
        {
            Ok(request) => request,
            Err(e) => {
                tracing::error!(provider = %self.name, error = %e, "Failed to build liveness request");
                return false;
            }
        };

        match time::timeout(self.timeout, self.client.request(request)).await {
            Ok(Ok(response)) => response.status().is_success(),
            Ok(Err(e)) => {
                tracing::debug!(provider = %self.name, error = %e, "Liveness check failed: connection error");
                false
            }
            Err(_) => {
                tracing::debug!(provider = %self.name, "Liveness check failed: timeout");
                false
            }
        }
    }
}
