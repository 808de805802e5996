//! # Donation Types
//!
//! Domain types and port traits for the donation relay.
//! This crate has ZERO external IO dependencies - only data structures,
//! payload assembly rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate is the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Donation, Timestamp, Password, PushPaymentPayload)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Validation, gateway and application error types
//! - `settings/` - Business settings validated once at startup

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;
pub mod settings;

// Re-export commonly used types
pub use domain::{
    AccessToken, Amount, Donation, Password, PhoneNumber, PushPaymentPayload, Timestamp,
    TransactionType,
};
pub use dto::*;
pub use error::{AppError, GatewayError, ValidationError};
pub use ports::{Clock, FixedClock, PaymentGateway, SystemClock};
pub use settings::BusinessSettings;
