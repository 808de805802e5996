//! DonationService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{FixedOffset, TimeZone, Utc};
    use serde_json::{Value, json};

    use donation_types::{
        AccessToken, AppError, BusinessSettings, DonationRequest, FixedClock, GatewayError,
        PaymentGateway, PushPaymentPayload, ValidationError,
    };

    use crate::DonationService;

    /// Scripted gateway that records every call in order.
    pub struct MockGateway {
        token: Option<&'static str>,
        push_response: Option<Value>,
        calls: Mutex<Vec<&'static str>>,
        payloads: Mutex<Vec<Value>>,
        bearers: Mutex<Vec<String>>,
    }

    impl MockGateway {
        pub fn new() -> Self {
            Self {
                token: Some("abc"),
                push_response: Some(json!({ "MerchantRequestID": "1" })),
                calls: Mutex::new(Vec::new()),
                payloads: Mutex::new(Vec::new()),
                bearers: Mutex::new(Vec::new()),
            }
        }

        pub fn failing_token() -> Self {
            Self {
                token: None,
                ..Self::new()
            }
        }

        pub fn failing_push() -> Self {
            Self {
                push_response: None,
                ..Self::new()
            }
        }

        pub fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PaymentGateway for MockGateway {
        async fn fetch_access_token(&self) -> Result<AccessToken, GatewayError> {
            self.calls.lock().unwrap().push("token");
            self.token
                .map(AccessToken::new)
                .ok_or_else(|| GatewayError::Status {
                    status: 400,
                    body: r#"{"errorMessage":"Invalid credentials"}"#.into(),
                })
        }

        async fn submit_push_payment(
            &self,
            token: &AccessToken,
            payload: &PushPaymentPayload,
        ) -> Result<Value, GatewayError> {
            self.calls.lock().unwrap().push("push");
            self.bearers.lock().unwrap().push(token.as_str().to_string());
            self.payloads
                .lock()
                .unwrap()
                .push(serde_json::to_value(payload).unwrap());
            self.push_response.clone().ok_or_else(|| GatewayError::Status {
                status: 500,
                body: r#"{"errorMessage":"Unable to lock subscriber"}"#.into(),
            })
        }
    }

    pub fn settings() -> BusinessSettings {
        BusinessSettings {
            short_code: "600000".into(),
            pass_key: "passkey".into(),
            callback_url: "https://example.com/callback".into(),
            account_reference: "Donation".into(),
            transaction_desc: "Charity Donation".into(),
            utc_offset: FixedOffset::east_opt(3 * 3600).unwrap(),
        }
    }

    fn service(gateway: MockGateway) -> DonationService<MockGateway> {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap());
        DonationService::new(gateway, settings()).with_clock(clock)
    }

    #[tokio::test]
    async fn test_donate_success_relays_gateway_response() {
        let service = service(MockGateway::new());

        let response = service
            .donate(DonationRequest::new("254712345678", 100))
            .await
            .unwrap();

        assert_eq!(response, json!({ "MerchantRequestID": "1" }));
        assert_eq!(service.gateway().calls(), vec!["token", "push"]);
        assert_eq!(*service.gateway().bearers.lock().unwrap(), vec!["abc"]);
    }

    #[tokio::test]
    async fn test_donate_builds_payload_from_settings_and_clock() {
        let service = service(MockGateway::new());

        service
            .donate(DonationRequest::new("254712345678", 100))
            .await
            .unwrap();

        let payloads = service.gateway().payloads.lock().unwrap();
        assert_eq!(payloads.len(), 1);
        let sent = &payloads[0];
        assert_eq!(sent["Timestamp"], "20240101090000");
        assert_eq!(sent["Password"], "NjAwMDAwcGFzc2tleTIwMjQwMTAxMDkwMDAw");
        assert_eq!(sent["Amount"], 100);
        assert_eq!(sent["PhoneNumber"], "254712345678");
        assert_eq!(sent["CallBackURL"], "https://example.com/callback");
        assert_eq!(sent["TransactionDesc"], "Charity Donation");
    }

    #[tokio::test]
    async fn test_transaction_desc_override() {
        let service = service(MockGateway::new());

        service
            .donate_described(
                DonationRequest::new("254712345678", 100),
                Some("Donation to Mani Group Foundation"),
            )
            .await
            .unwrap();

        let payloads = service.gateway().payloads.lock().unwrap();
        assert_eq!(
            payloads[0]["TransactionDesc"],
            "Donation to Mani Group Foundation"
        );
        assert_eq!(payloads[0]["AccountReference"], "Donation");
    }

    #[tokio::test]
    async fn test_missing_phone_makes_no_gateway_call() {
        let service = service(MockGateway::new());

        let result = service
            .donate(DonationRequest {
                phone: None,
                amount: Some(json!(100)),
            })
            .await;

        assert!(matches!(
            result,
            Err(AppError::Validation(ValidationError::MissingFields))
        ));
        assert!(service.gateway().calls().is_empty());
    }

    #[tokio::test]
    async fn test_zero_amount_makes_no_gateway_call() {
        let service = service(MockGateway::new());

        let result = service
            .donate(DonationRequest::new("254712345678", 0))
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(service.gateway().calls().is_empty());
    }

    #[tokio::test]
    async fn test_token_failure_skips_push() {
        let service = service(MockGateway::failing_token());

        let result = service
            .donate(DonationRequest::new("254712345678", 100))
            .await;

        assert!(matches!(result, Err(AppError::UpstreamAuth(_))));
        assert_eq!(service.gateway().calls(), vec!["token"]);
    }

    #[tokio::test]
    async fn test_push_failure_is_reported_once() {
        let service = service(MockGateway::failing_push());

        let result = service
            .donate(DonationRequest::new("254712345678", 100))
            .await;

        assert!(matches!(result, Err(AppError::UpstreamPayment(_))));
        assert_eq!(service.gateway().calls(), vec!["token", "push"]);
    }

    #[tokio::test]
    async fn test_each_donation_fetches_its_own_token() {
        let service = service(MockGateway::new());

        let (a, b) = tokio::join!(
            service.donate(DonationRequest::new("254712345678", 100)),
            service.donate(DonationRequest::new("254700000001", 50)),
        );
        a.unwrap();
        b.unwrap();

        let calls = service.gateway().calls();
        assert_eq!(calls.iter().filter(|c| **c == "token").count(), 2);
        assert_eq!(calls.iter().filter(|c| **c == "push").count(), 2);
    }
}
