//! # Donation Gateway
//!
//! Outbound adapter that implements the `PaymentGateway` port against the
//! Safaricom Daraja API:
//! - `GET  /oauth/v1/generate?grant_type=client_credentials` (Basic auth)
//! - `POST /mpesa/stkpush/v1/processrequest` (Bearer auth)
//!
//! One `reqwest::Client` is shared by all requests. Every call carries the
//! configured timeout; only the token fetch is ever retried.

mod auth;
mod daraja;

pub use auth::basic_auth_header;
pub use daraja::{DarajaGateway, GatewaySettings};

/// Sandbox base URL, used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://sandbox.safaricom.co.ke";
