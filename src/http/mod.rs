//! HTTP surface of the gateway.
//!
//! # Data Flow
//! ```text
//! POST /notifications
//!     → server.rs handler
//!     → FailoverDispatcher::send
//!     → 200 with {message_id, status, provider_used}
//!     → 502 when both providers failed
//!
//! GET /health, GET /status → status reporting
//! /admin/* → admin subsystem (bearer auth)
//! ```

pub mod server;

pub use server::HttpServer;
