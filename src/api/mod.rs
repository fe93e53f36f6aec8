//! HTTP adapter for the command interpreter.
//!
//! `POST /comando` runs one interpretation; `GET /` is a liveness probe.
//! Middleware stack: CORS → Audit → Handler.
//!
//! The router is composable: `comando_router()` returns a `Router`
//! that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::comando_router;
pub use server::{serve, start_server, ServerError, ServerHandle};
pub use types::ApiContext;
