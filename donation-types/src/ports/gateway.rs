//! Payment gateway port trait.
//!
//! This is the primary outbound port of the relay.
//! The Daraja HTTP adapter implements it; tests inject counting mocks.

use serde_json::Value;

use crate::domain::{AccessToken, PushPaymentPayload};
use crate::error::GatewayError;

/// The mobile-money gateway, as seen by the donation pipeline.
///
/// Calls are sequential per donation: a token is always fetched before the
/// push payment it authorizes.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    /// Fetches a fresh bearer token using the client credentials.
    async fn fetch_access_token(&self) -> Result<AccessToken, GatewayError>;

    /// Submits one push payment and returns the gateway's JSON reply untouched.
    ///
    /// Not idempotent: implementations MUST NOT retry this call.
    async fn submit_push_payment(
        &self,
        token: &AccessToken,
        payload: &PushPaymentPayload,
    ) -> Result<Value, GatewayError>;
}
