//! actionsock gateway binary.
//!
//! - Loads `.env`, then the YAML config (`ACTIONSOCK_CONFIG`, default
//!   `actionsock.yaml`)
//! - Fails fast when the token secret is missing
//! - Serves the WebSocket endpoint at /v1/ws

use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};

use actionsock_core::error::{ActionSockError, Result};
use actionsock_gateway::{app_state, config, router};

const DEFAULT_CONFIG_PATH: &str = "actionsock.yaml";

#[tokio::main]
async fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "actionsock-gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::var("ACTIONSOCK_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg
        .gateway
        .listen
        .parse()
        .map_err(|e| ActionSockError::Config(format!("gateway.listen must be a valid SocketAddr: {e}")))?;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "actionsock-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| ActionSockError::Internal(format!("failed to bind {listen}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ActionSockError::Internal(format!("server failed: {e}")))
}
