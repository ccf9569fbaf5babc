//! HTTP server setup and public handlers.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (request IDs, tracing, request timeout)
//! - Mount the admin router when enabled
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::admin::{self, AdminControl, HealthReport};
use crate::config::GatewayConfig;
use crate::dispatch::{ActiveProvider, FailoverDispatcher};
use crate::observability::metrics;
use crate::provider::Notification;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<FailoverDispatcher>,
    pub admin: Arc<AdminControl>,
    pub admin_api_key: Arc<str>,
}

/// HTTP server for the notification gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Assemble the router from explicitly constructed components.
    pub fn new(
        config: GatewayConfig,
        dispatcher: Arc<FailoverDispatcher>,
        admin: Arc<AdminControl>,
    ) -> Self {
        let state = AppState {
            dispatcher,
            admin,
            admin_api_key: config.admin.api_key.clone().into(),
        };

        let mut router = Router::new()
            .route("/notifications", post(send_notification))
            .route("/health", get(health))
            .route("/status", get(status));

        if config.admin.enabled {
            router = router.merge(admin::admin_router(state.clone()));
        }

        // Request IDs are minted outermost so the trace span and every
        // handler see the same `x-request-id`, which is also echoed back
        // on the response.
        let router = router.with_state(state).layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(PropagateRequestIdLayer::x_request_id()),
        );

        Self { router }
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub message: String,
    pub customer_id: String,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub message_id: String,
    pub status: &'static str,
    pub provider_used: ActiveProvider,
    /// Delivery identifier reported by the provider, when it sent one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_message_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendErrorResponse {
    error: &'static str,
    detail: String,
}

/// Main dispatch handler.
async fn send_notification(
    State(state): State<AppState>,
    Json(request): Json<SendRequest>,
) -> Response {
    let start = Instant::now();
    let message_id = Uuid::new_v4().to_string();

    tracing::debug!(
        message_id = %message_id,
        customer_id = %request.customer_id,
        "Dispatching notification"
    );

    let notification = Notification {
        message: request.message,
        customer_id: request.customer_id,
    };

    match state.dispatcher.send(&notification).await {
        Ok(dispatch) => {
            metrics::record_send(&dispatch.provider.to_string(), "sent", start);
            tracing::info!(
                message_id = %message_id,
                provider = %dispatch.provider,
                "Notification delivered"
            );
            Json(SendResponse {
                message_id,
                status: "sent",
                provider_used: dispatch.provider,
                provider_message_id: dispatch.receipt.provider_message_id,
            })
            .into_response()
        }
        Err(e) => {
            metrics::record_send("none", "failed", start);
            tracing::error!(message_id = %message_id, error = %e, "Notification undeliverable");
            (
                StatusCode::BAD_GATEWAY,
                Json(SendErrorResponse {
                    error: "all providers failed",
                    detail: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Serialize)]
struct ServiceHealth {
    status: &'static str,
    circuit_breaker: HealthReport,
}

/// Service liveness plus breaker detail.
async fn health(State(state): State<AppState>) -> Json<ServiceHealth> {
    Json(ServiceHealth {
        status: "healthy",
        circuit_breaker: state.admin.status_snapshot().await,
    })
}

/// Breaker and active-provider report.
async fn status(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.admin.status_snapshot().await)
}
