//! Domain models for the donation relay.

pub mod donation;
pub mod password;
pub mod payload;
pub mod token;

pub use donation::{Amount, Donation, PhoneNumber};
pub use password::{Password, Timestamp};
pub use payload::{PushPaymentPayload, TransactionType};
pub use token::AccessToken;
