//! Administrative override and introspection.
//!
//! # Data Flow
//! ```text
//! Operator / gateway-cli
//!     → auth.rs (bearer token check)
//!     → handlers.rs (axum endpoints)
//!     → control.rs (probe-gated reset, recovery probe, status snapshot)
//! ```
//!
//! # Design Decisions
//! - Forced reset is probe-then-force: the breaker is only closed after
//!   the primary answers a live health check
//! - The breaker owns its own reset; nothing here reaches into its state

pub mod auth;
pub mod control;
pub mod handlers;

pub use control::{AdminControl, HealthReport, ResetOutcome};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::http::server::AppState;

use self::auth::admin_auth_middleware;
use self::handlers::{admin_status, force_recovery, reset_breaker};

pub fn admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/status", get(admin_status))
        .route("/admin/force-recovery", post(force_recovery))
        .route("/admin/reset", post(reset_breaker))
        .layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
