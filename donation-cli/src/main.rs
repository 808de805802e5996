//! Donation CLI
//!
//! Command-line interface for the donation relay API.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

use donation_client::DonationClient;
use donation_types::{CallbackAck, StkCallbackEnvelope};

#[derive(Parser)]
#[command(name = "donate")]
#[command(author, version, about = "Donation relay CLI client", long_about = None)]
struct Cli {
    /// Base URL of the donation relay
    #[arg(
        long,
        env = "DONATION_API_URL",
        default_value = "http://localhost:3000"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a donation prompt to a phone
    Push {
        /// Payer phone number, e.g. 254712345678
        #[arg(long)]
        phone: String,
        /// Amount to charge
        #[arg(long)]
        amount: String,
        /// Relay route to call
        #[arg(long, value_enum, default_value_t = Route::Stkpush)]
        route: Route,
    },
    /// Callback operations
    Callback {
        #[command(subcommand)]
        action: CallbackCommands,
    },
    /// Check API health
    Health,
}

#[derive(Subcommand)]
enum CallbackCommands {
    /// Start a local listener that prints STK results
    Listen {
        /// Port to listen on
        #[arg(long, default_value = "4000")]
        port: u16,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Route {
    Stkpush,
    Donate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let client = DonationClient::new(&cli.api_url);

    match cli.command {
        Commands::Push {
            phone,
            amount,
            route,
        } => {
            let amount = amount_value(&amount);
            let reply = match route {
                Route::Stkpush => client.stk_push(phone, amount).await?,
                Route::Donate => client.donate(phone, amount).await?,
            };
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }

        Commands::Callback { action } => match action {
            CallbackCommands::Listen { port } => {
                let app =
                    axum::Router::new().route("/callback", axum::routing::post(handle_callback));
                let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
                println!("Listening for STK callbacks on {}/callback", addr);
                let listener = tokio::net::TcpListener::bind(&addr).await?;
                axum::serve(listener, app).await?;
            }
        },

        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Numeric input is sent as a JSON number, anything else as a string.
fn amount_value(raw: &str) -> Value {
    raw.parse::<serde_json::Number>()
        .map(Value::Number)
        .unwrap_or_else(|_| Value::String(raw.to_string()))
}

async fn handle_callback(body: String) -> axum::Json<CallbackAck> {
    match serde_json::from_str::<StkCallbackEnvelope>(&body) {
        Ok(envelope) => {
            let cb = envelope.body.stk_callback;
            println!(
                "[{}] {} ({}): {}",
                cb.result_code, cb.checkout_request_id, cb.merchant_request_id, cb.result_desc
            );
        }
        Err(_) => println!("unrecognised callback: {}", body),
    }
    axum::Json(CallbackAck::accepted())
}
