//! # Donation Hex
//!
//! Application service layer and HTTP adapter for the donation relay.
//!
//! ## Architecture
//!
//! - `service/` - Application service (the token → password → push pipeline)
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `G: PaymentGateway`, allowing
//! different gateway implementations to be injected.

pub mod inbound;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use service::DonationService;
