mod api;
mod config;
mod db;
mod error;
mod events;
mod model;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use api::state::AppState;
use config::Config;
use db::Store;
use events::EventHub;

#[derive(Parser)]
#[command(name = "syncboard")]
#[command(version)]
#[command(about = "Real-time task board backend (REST + WebSocket sync)")]
struct Cli {
    /// Port to listen on (overrides the PORT environment variable)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("syncboard=info,tower_http=info")),
        )
        .compact()
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(port) = cli.port {
        config.port = port;
    }

    // Listening with an unreachable backing store would leave every data
    // route broken, so a failed connection is fatal.
    let store = match Store::connect(&config).await {
        Ok(store) => store,
        Err(err) => {
            error!(%err, "failed to connect to the document store");
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(store, EventHub::new());
    if let Err(err) = api::start_server(config.port, state).await {
        error!(%err, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
