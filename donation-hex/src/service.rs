//! Donation Application Service
//!
//! Orchestrates one donation through the gateway port.
//! Contains NO infrastructure logic - pure pipeline orchestration.

use std::sync::Arc;

use serde_json::Value;

use donation_types::{
    AppError, BusinessSettings, Clock, Donation, DonationRequest, PaymentGateway,
    PushPaymentPayload, SystemClock, Timestamp,
};

/// Application service for donation requests.
///
/// Generic over `G: PaymentGateway` - the adapter is injected at compile time.
/// Holds no per-request state; concurrent donations share it read-only.
pub struct DonationService<G: PaymentGateway> {
    gateway: G,
    settings: BusinessSettings,
    clock: Arc<dyn Clock>,
}

impl<G: PaymentGateway> DonationService<G> {
    /// Creates a new donation service reading the host clock.
    pub fn new(gateway: G, settings: BusinessSettings) -> Self {
        Self {
            gateway,
            settings,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for gateway timestamps.
    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Returns a reference to the underlying gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Current gateway timestamp in the configured offset.
    pub fn timestamp(&self) -> Timestamp {
        Timestamp::at(self.clock.now(), self.settings.utc_offset)
    }

    /// Validates the request and relays it to the gateway.
    pub async fn donate(&self, req: DonationRequest) -> Result<Value, AppError> {
        self.donate_described(req, None).await
    }

    /// Like [`donate`](Self::donate), with `transaction_desc` replacing the
    /// configured description when given.
    pub async fn donate_described(
        &self,
        req: DonationRequest,
        transaction_desc: Option<&str>,
    ) -> Result<Value, AppError> {
        let donation = req.validate()?;
        self.relay(&donation, transaction_desc).await
    }

    /// Fetches a token, then submits exactly one push payment.
    ///
    /// Gateway error detail is logged here and kept on the error value;
    /// callers must not expose it.
    #[tracing::instrument(skip_all, fields(phone = %donation.phone, amount = %donation.amount))]
    pub async fn relay(
        &self,
        donation: &Donation,
        transaction_desc: Option<&str>,
    ) -> Result<Value, AppError> {
        let token = self.gateway.fetch_access_token().await.map_err(|e| {
            tracing::error!(error = %e, "Error fetching access token");
            AppError::UpstreamAuth(e)
        })?;

        let mut payload = PushPaymentPayload::new(&self.settings, donation, self.timestamp());
        if let Some(desc) = transaction_desc {
            payload.transaction_desc = desc.to_string();
        }

        let response = self
            .gateway
            .submit_push_payment(&token, &payload)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "STK push error");
                AppError::UpstreamPayment(e)
            })?;

        tracing::info!("STK push accepted by gateway");
        Ok(response)
    }
}
