//! HTTP request handlers.

use std::{collections::HashMap, sync::Arc};

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use donation_types::{
    AppError, CallbackAck, DonationRequest, PaymentGateway, StkCallbackEnvelope, ValidationError,
};

use super::variant::RouteVariant;
use crate::DonationService;

/// Application state shared across handlers.
pub struct AppState<G: PaymentGateway> {
    pub service: DonationService<G>,
    pub transaction_descs: HashMap<RouteVariant, String>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
///
/// Carries the route variant because each variant renders its own body.
pub struct ApiError {
    pub variant: RouteVariant,
    pub error: AppError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.error {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamAuth(_) | AppError::UpstreamPayment(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let mut body = serde_json::Map::new();
        body.insert(
            self.variant.error_key().to_string(),
            Value::from(self.variant.error_message(&self.error)),
        );

        (status, Json(Value::Object(body))).into_response()
    }
}

/// Liveness string.
pub async fn root() -> &'static str {
    "M-Pesa STK Push API is running..."
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// `POST /stkpush`
pub async fn stk_push<G: PaymentGateway>(
    State(state): State<Arc<AppState<G>>>,
    body: Result<Json<DonationRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    handle_donation(&state, RouteVariant::StkPush, body).await
}

/// `POST /donate`
pub async fn donate<G: PaymentGateway>(
    State(state): State<Arc<AppState<G>>>,
    body: Result<Json<DonationRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    handle_donation(&state, RouteVariant::Donate, body).await
}

#[tracing::instrument(skip(state, body), fields(route = %variant))]
async fn handle_donation<G: PaymentGateway>(
    state: &AppState<G>,
    variant: RouteVariant,
    body: Result<Json<DonationRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected donation body");
            return Err(ApiError {
                variant,
                error: ValidationError::MalformedBody(rejection.body_text()).into(),
            });
        }
    };

    let transaction_desc = state.transaction_descs.get(&variant).map(String::as_str);
    let response = state
        .service
        .donate_described(req, transaction_desc)
        .await
        .map_err(|error| ApiError { variant, error })?;

    Ok(Json(response))
}

/// Receives the gateway's asynchronous STK result.
///
/// Log-only: the callback is neither authenticated nor stored. Every body,
/// parseable or not, is acknowledged so the gateway stops redelivering.
#[tracing::instrument(skip_all)]
pub async fn callback(body: Result<Json<StkCallbackEnvelope>, JsonRejection>) -> Json<CallbackAck> {
    match body {
        Ok(Json(envelope)) => {
            let cb = envelope.body.stk_callback;
            if cb.result_code == 0 {
                tracing::info!(
                    merchant_request_id = %cb.merchant_request_id,
                    checkout_request_id = %cb.checkout_request_id,
                    "STK push completed"
                );
            } else {
                tracing::warn!(
                    merchant_request_id = %cb.merchant_request_id,
                    checkout_request_id = %cb.checkout_request_id,
                    result_code = cb.result_code,
                    result_desc = %cb.result_desc,
                    "STK push did not complete"
                );
            }
        }
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Unparseable STK callback body");
        }
    }

    Json(CallbackAck::accepted())
}
