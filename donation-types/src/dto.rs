//! Data Transfer Objects (DTOs) for requests and responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::Donation;
use crate::error::ValidationError;

// ─────────────────────────────────────────────────────────────────────────────
// Donation DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Inbound donation body. Both fields are optional on the wire so that a
/// missing field surfaces as a validation error rather than a decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DonationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Value>,
}

impl DonationRequest {
    pub fn new(phone: impl Into<Value>, amount: impl Into<Value>) -> Self {
        Self {
            phone: Some(phone.into()),
            amount: Some(amount.into()),
        }
    }

    /// Applies the presence rule and produces a typed donation.
    pub fn validate(self) -> Result<Donation, ValidationError> {
        Donation::from_fields(self.phone, self.amount)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Gateway token DTO
// ─────────────────────────────────────────────────────────────────────────────

/// Body of the gateway's `oauth/v1/generate` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<Value>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Callback DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Asynchronous STK result posted by the gateway to the callback URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StkCallbackEnvelope {
    #[serde(rename = "Body")]
    pub body: StkCallbackBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StkCallbackBody {
    #[serde(rename = "stkCallback")]
    pub stk_callback: StkCallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StkCallback {
    #[serde(rename = "MerchantRequestID")]
    pub merchant_request_id: String,
    #[serde(rename = "CheckoutRequestID")]
    pub checkout_request_id: String,
    #[serde(rename = "ResultCode")]
    pub result_code: i64,
    #[serde(rename = "ResultDesc")]
    pub result_desc: String,
    #[serde(rename = "CallbackMetadata", default, skip_serializing_if = "Option::is_none")]
    pub callback_metadata: Option<Value>,
}

/// Acknowledgement returned to the gateway for every callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackAck {
    #[serde(rename = "ResultCode")]
    pub result_code: i64,
    #[serde(rename = "ResultDesc")]
    pub result_desc: String,
}

impl CallbackAck {
    pub fn accepted() -> Self {
        Self {
            result_code: 0,
            result_desc: "Accepted".into(),
        }
    }
}
