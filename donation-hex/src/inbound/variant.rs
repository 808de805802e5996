//! Route variants of the donation endpoint.
//!
//! Both variants run the same pipeline; they differ only in path and in
//! the shape of their error bodies.

use std::fmt;
use std::str::FromStr;

use donation_types::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteVariant {
    /// `POST /stkpush`, errors as `{"message": ...}`
    StkPush,
    /// `POST /donate`, errors as `{"error": ...}`
    Donate,
}

impl RouteVariant {
    pub const ALL: [RouteVariant; 2] = [RouteVariant::StkPush, RouteVariant::Donate];

    pub fn path(self) -> &'static str {
        match self {
            RouteVariant::StkPush => "/stkpush",
            RouteVariant::Donate => "/donate",
        }
    }

    /// Key under which the error message is rendered.
    pub fn error_key(self) -> &'static str {
        match self {
            RouteVariant::StkPush => "message",
            RouteVariant::Donate => "error",
        }
    }

    /// Caller-facing message. Never includes gateway detail.
    pub fn error_message(self, err: &AppError) -> &'static str {
        match (self, err) {
            (RouteVariant::StkPush, AppError::Validation(_)) => {
                "Phone number and amount are required"
            }
            (RouteVariant::StkPush, AppError::UpstreamAuth(_)) => "Failed to get access token",
            (RouteVariant::StkPush, AppError::UpstreamPayment(_)) => "STK Push request failed",
            (RouteVariant::Donate, AppError::Validation(_)) => {
                "Amount and phone number are required."
            }
            (RouteVariant::Donate, AppError::UpstreamAuth(_) | AppError::UpstreamPayment(_)) => {
                "Error processing donation."
            }
        }
    }
}

impl fmt::Display for RouteVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteVariant::StkPush => f.write_str("stkpush"),
            RouteVariant::Donate => f.write_str("donate"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown route variant: {0} (expected `stkpush` or `donate`)")]
pub struct UnknownRouteVariant(pub String);

impl FromStr for RouteVariant {
    type Err = UnknownRouteVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('/').to_ascii_lowercase().as_str() {
            "stkpush" => Ok(RouteVariant::StkPush),
            "donate" => Ok(RouteVariant::Donate),
            other => Err(UnknownRouteVariant(other.to_string())),
        }
    }
}
