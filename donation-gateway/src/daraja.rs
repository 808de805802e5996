use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tracing::instrument;

use donation_types::{
    AccessToken, GatewayError, PaymentGateway, PushPaymentPayload, TokenResponse,
};

use crate::auth::basic_auth_header;

const TOKEN_PATH: &str = "/oauth/v1/generate?grant_type=client_credentials";
const PUSH_PATH: &str = "/mpesa/stkpush/v1/processrequest";

/// The first attempt plus one retry.
const TOKEN_ATTEMPTS: u32 = 2;

/// Connection settings for the Daraja API.
#[derive(Clone)]
pub struct GatewaySettings {
    pub base_url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    /// Applied to every outbound call
    pub timeout: Duration,
    /// Pause before the single token-fetch retry
    pub token_retry_delay: Duration,
}

impl GatewaySettings {
    pub fn new(
        base_url: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            timeout: Duration::from_secs(30),
            token_retry_delay: Duration::from_millis(250),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_token_retry_delay(mut self, delay: Duration) -> Self {
        self.token_retry_delay = delay;
        self
    }
}

impl std::fmt::Debug for GatewaySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewaySettings")
            .field("base_url", &self.base_url)
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"***")
            .field("timeout", &self.timeout)
            .field("token_retry_delay", &self.token_retry_delay)
            .finish()
    }
}

/// `PaymentGateway` backed by the Daraja REST API.
#[derive(Debug, Clone)]
pub struct DarajaGateway {
    settings: GatewaySettings,
    client: reqwest::Client,
}

impl DarajaGateway {
    pub fn new(settings: GatewaySettings) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(transport)?;
        Ok(Self { settings, client })
    }

    async fn request_token(&self) -> Result<AccessToken, GatewayError> {
        let url = format!("{}{}", self.settings.base_url, TOKEN_PATH);
        let auth = basic_auth_header(&self.settings.consumer_key, &self.settings.consumer_secret);

        let res = self
            .client
            .get(&url)
            .header(AUTHORIZATION, auth)
            .send()
            .await
            .map_err(transport)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let token = res.json::<TokenResponse>().await.map_err(transport)?;
        token
            .access_token
            .filter(|t| !t.is_empty())
            .map(AccessToken::new)
            .ok_or(GatewayError::MissingToken)
    }
}

#[async_trait::async_trait]
impl PaymentGateway for DarajaGateway {
    #[instrument(skip(self))]
    async fn fetch_access_token(&self) -> Result<AccessToken, GatewayError> {
        let mut attempt = 1;
        loop {
            match self.request_token().await {
                Ok(token) => return Ok(token),
                Err(e) if e.is_transient() && attempt < TOKEN_ATTEMPTS => {
                    tracing::warn!(attempt, error = %e, "Token fetch failed, retrying");
                    tokio::time::sleep(self.settings.token_retry_delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    #[instrument(skip_all, fields(phone = %payload.phone_number, amount = %payload.amount))]
    async fn submit_push_payment(
        &self,
        token: &AccessToken,
        payload: &PushPaymentPayload,
    ) -> Result<Value, GatewayError> {
        let url = format!("{}{}", self.settings.base_url, PUSH_PATH);
        tracing::debug!(%url, timestamp = %payload.timestamp, "Gateway push payment request");

        let res = self
            .client
            .post(&url)
            .bearer_auth(token.as_str())
            .json(payload)
            .send()
            .await
            .map_err(transport)?;

        let status = res.status();
        let body = res.text().await.map_err(transport)?;
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(status = status.as_u16(), "Gateway push payment response");
        serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

fn transport(err: reqwest::Error) -> GatewayError {
    if err.is_decode() {
        return GatewayError::Decode(err.to_string());
    }
    GatewayError::Transport(err.to_string())
}
