//! # Donation Client SDK
//!
//! A typed Rust client for the donation relay API.

use donation_types::DonationRequest;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Donation relay API client.
pub struct DonationClient {
    base_url: String,
    http: Client,
}

impl DonationClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Checks if the relay is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Sends a donation through `POST /stkpush`; returns the gateway reply.
    pub async fn stk_push(
        &self,
        phone: impl Into<Value>,
        amount: impl Into<Value>,
    ) -> Result<Value, ClientError> {
        self.post("/stkpush", &DonationRequest::new(phone, amount))
            .await
    }

    /// Sends a donation through `POST /donate`; returns the gateway reply.
    pub async fn donate(
        &self,
        phone: impl Into<Value>,
        amount: impl Into<Value>,
    ) -> Result<Value, ClientError> {
        self.post("/donate", &DonationRequest::new(phone, amount))
            .await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(body),
            })
        }
    }
}

/// Pulls the message out of either error shape the relay emits
/// (`{"error": ..}` or `{"message": ..}`), falling back to the raw body.
fn error_message(body: String) -> String {
    serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            ["error", "message"]
                .iter()
                .find_map(|key| v.get(key).and_then(|m| m.as_str()).map(String::from))
        })
        .unwrap_or(body)
}
