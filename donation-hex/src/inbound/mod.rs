//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the application layer.

mod handlers;
mod rate_limit;
mod server;
mod variant;

pub use server::{HttpServer, ServerOptions};
pub use variant::{RouteVariant, UnknownRouteVariant};
