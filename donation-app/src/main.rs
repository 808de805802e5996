//! # Donation Relay
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Build the Daraja gateway adapter
//! - Create the donation service
//! - Start the HTTP server

mod config;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use donation_gateway::DarajaGateway;
use donation_hex::{DonationService, inbound::HttpServer};

fn init_tracing() {
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,donation_app=debug,donation_hex=debug,donation_gateway=debug".into()
            }),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    // Load and validate configuration once
    let config = config::Config::from_env()?;

    tracing::info!("Starting donation relay on port {}", config.port);
    tracing::info!(
        gateway = %config.gateway.base_url,
        short_code = %config.business.short_code,
        utc_offset = %config.business.utc_offset,
        "Using payment gateway"
    );

    let gateway = DarajaGateway::new(config.gateway)?;

    // Create the donation service
    let service = DonationService::new(gateway, config.business);

    // Create and run the HTTP server
    let server = HttpServer::with_options(service, config.server);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    tracing::info!("Donation relay stopped");
    Ok(())
}
