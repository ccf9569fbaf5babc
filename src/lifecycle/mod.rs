//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → build providers, breaker, dispatcher, probe,
//!     admin control → HTTP server
//!
//! Shutdown (shutdown.rs):
//!     SIGINT observed → broadcast → server drains and exits
//! ```

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{build_gateway, StartupError};
