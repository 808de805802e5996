//! Error types for the donation relay.

/// Client-supplied request problems.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("phone and amount are required")]
    MissingFields,

    #[error("{0} must be a string or a number")]
    UnsupportedType(&'static str),

    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

/// Outbound gateway failures (token fetch or push payment).
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("gateway returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("token response did not contain an access token")]
    MissingToken,

    #[error("failed to decode gateway response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Whether repeating the same idempotent call could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::Transport(_) => true,
            GatewayError::Status { status, .. } => *status >= 500,
            GatewayError::MissingToken | GatewayError::Decode(_) => false,
        }
    }
}

/// Application-level errors (for HTTP responses).
///
/// Upstream variants keep the gateway detail for server-side logs only;
/// the inbound adapter never renders it.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to get access token: {0}")]
    UpstreamAuth(GatewayError),

    #[error("Push payment request failed: {0}")]
    UpstreamPayment(GatewayError),
}
