//! HTTP Server configuration and startup.

use std::{collections::HashMap, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use donation_types::PaymentGateway;

use super::handlers::{self, AppState};
use super::rate_limit::{RateLimiterState, rate_limit_middleware};
use super::variant::RouteVariant;
use crate::DonationService;

/// How often fully refilled rate-limit buckets are dropped.
const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

/// Inbound surface settings.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Donation routes to mount
    pub routes: Vec<RouteVariant>,
    /// Per-client quota on the donation routes
    pub requests_per_minute: u32,
    /// Rate-limit on the first `X-Forwarded-For` hop instead of the peer
    pub trust_forwarded_for: bool,
    /// Per-route `TransactionDesc`; routes not listed use the business default
    pub transaction_descs: HashMap<RouteVariant, String>,
    /// Path the gateway posts STK results to
    pub callback_path: String,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            routes: RouteVariant::ALL.to_vec(),
            requests_per_minute: 60,
            trust_forwarded_for: false,
            transaction_descs: HashMap::new(),
            callback_path: "/callback".into(),
        }
    }
}

/// HTTP Server for the donation relay.
pub struct HttpServer<G: PaymentGateway> {
    state: Arc<AppState<G>>,
    rate_limiter: Arc<RateLimiterState>,
    options: ServerOptions,
}

impl<G: PaymentGateway> HttpServer<G> {
    /// Creates a new HTTP server with both donation routes and default limits.
    pub fn new(service: DonationService<G>) -> Self {
        Self::with_options(service, ServerOptions::default())
    }

    pub fn with_options(service: DonationService<G>, options: ServerOptions) -> Self {
        Self {
            state: Arc::new(AppState {
                service,
                transaction_descs: options.transaction_descs.clone(),
            }),
            rate_limiter: Arc::new(
                RateLimiterState::per_minute(options.requests_per_minute)
                    .trust_forwarded_for(options.trust_forwarded_for),
            ),
            options,
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        let mut donations = Router::new();
        for variant in &self.options.routes {
            donations = match variant {
                RouteVariant::StkPush => {
                    donations.route(variant.path(), post(handlers::stk_push::<G>))
                }
                RouteVariant::Donate => donations.route(variant.path(), post(handlers::donate::<G>)),
            };
        }
        let donations = donations.layer(middleware::from_fn_with_state(
            self.rate_limiter.clone(),
            rate_limit_middleware,
        ));

        Router::new()
            .route("/", get(handlers::root))
            .route("/health", get(handlers::health))
            .route(&self.options.callback_path, post(handlers::callback))
            .merge(donations)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);
        tracing::info!(
            routes = ?self.options.routes.iter().map(|v| v.path()).collect::<Vec<_>>(),
            callback = %self.options.callback_path,
            "Donation routes mounted"
        );

        let limiter = self.rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(EVICTION_INTERVAL);
            loop {
                interval.tick().await;
                limiter.evict_idle();
            }
        });

        axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
