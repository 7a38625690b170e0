//! Relay binary.
//!
//! Environment (a `.env` file is read if present):
//!   BIND_ADDR           - listen address (default 127.0.0.1)
//!   PORT                - listen port (default 8000)
//!   PING_INTERVAL_SECS  - keepalive ping period (default 10)
//!   RUST_LOG            - tracing filter (default info)

use anyhow::Context;
use rts_relay::{serve, RelayConfig};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = RelayConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let addr = cfg.socket_addr()?;
    let listener = TcpListener::bind(addr).await.with_context(|| format!("bind {addr}"))?;
    info!(%addr, "Listening");

    serve(listener, cfg).await
}
