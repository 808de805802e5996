//! Rate limiting middleware using Governor.
//!
//! Per-client token buckets in front of the donation routes, so a single
//! caller cannot flood phones with payment prompts.

use std::{net::SocketAddr, num::NonZeroU32, sync::Arc};

use axum::{
    Json,
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use serde_json::json;

/// Rate limiter state shared across requests.
pub struct RateLimiterState {
    /// One bucket per client key
    limiter: DefaultKeyedRateLimiter<String>,
    /// Key on the first `X-Forwarded-For` hop instead of the peer address.
    /// Only safe behind a proxy that overwrites the header.
    trust_forwarded_for: bool,
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::per_minute(60)
    }
}

impl RateLimiterState {
    /// Allows `requests` per minute per client, all available as a burst.
    /// A zero quota is treated as one request per minute.
    pub fn per_minute(requests: u32) -> Self {
        let burst = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(burst)),
            trust_forwarded_for: false,
        }
    }

    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    /// Checks if a request should be rate limited.
    /// Returns true if the request is allowed, false if rate limited.
    pub fn check(&self, key: &str) -> bool {
        self.limiter.check_key(&key.to_string()).is_ok()
    }

    /// Number of client buckets currently held.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    /// Drops buckets that have refilled completely.
    pub fn evict_idle(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Client identity: the peer IP, or the first `X-Forwarded-For` hop when
    /// that header is trusted. Requests without either share `"anonymous"`.
    fn client_key(&self, request: &Request<Body>) -> String {
        if self.trust_forwarded_for {
            let forwarded = request
                .headers()
                .get("X-Forwarded-For")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').next())
                .map(str::trim)
                .filter(|s| !s.is_empty());

            if let Some(client) = forwarded {
                return client.to_string();
            }
        }

        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "anonymous".to_string())
    }
}

/// Rate limiting middleware, layered on the donation routes only.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = limiter.client_key(&request);

    if !limiter.check(&key) {
        tracing::warn!(client = %key, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Rate limit exceeded. Please try again later.",
                "retry_after_seconds": 60
            })),
        )
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_from(peer: &str, forwarded_for: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder();
        if let Some(value) = forwarded_for {
            builder = builder.header("X-Forwarded-For", value);
        }
        let mut request = builder.body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));
        request
    }

    #[test]
    fn test_quota_is_per_key() {
        let limiter = RateLimiterState::per_minute(2);

        assert!(limiter.check("a"));
        assert!(limiter.check("a"));
        assert!(!limiter.check("a"));
        assert!(limiter.check("b"));
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn test_zero_quota_still_admits_one() {
        let limiter = RateLimiterState::per_minute(0);

        assert!(limiter.check("a"));
        assert!(!limiter.check("a"));
    }

    #[test]
    fn test_client_key_ignores_forwarded_for_by_default() {
        let limiter = RateLimiterState::per_minute(1);
        let request = request_from("198.51.100.4:5000", Some("203.0.113.7"));

        assert_eq!(limiter.client_key(&request), "198.51.100.4");
    }

    #[test]
    fn test_client_key_uses_forwarded_for_when_trusted() {
        let limiter = RateLimiterState::per_minute(1).trust_forwarded_for(true);
        let request = request_from("198.51.100.4:5000", Some("203.0.113.7, 10.0.0.1"));

        assert_eq!(limiter.client_key(&request), "203.0.113.7");
    }

    #[test]
    fn test_client_key_falls_back_to_peer_then_anonymous() {
        let limiter = RateLimiterState::per_minute(1).trust_forwarded_for(true);
        let request = request_from("198.51.100.4:5000", None);
        assert_eq!(limiter.client_key(&request), "198.51.100.4");

        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(limiter.client_key(&request), "anonymous");
    }
}
