//! WebSocket relay.
//!
//! Every client gets the recorded unit positions on connect. Each
//! `move_unit` a client sends is recorded and fanned out to all connected
//! clients, the sender included. Nothing is simulated here.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{interval_at, Instant};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::config::RelayConfig;
use crate::protocol::{GameMessage, Position};
use crate::relay::{RelayState, MAX_UNITS};

const BROADCAST_CAPACITY: usize = 100;
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

type SharedState = Arc<Mutex<RelayState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, RelayState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Accepts clients on `listener` forever. Accept errors (fd exhaustion and
/// the like) are logged and retried after a short pause.
pub async fn serve(listener: TcpListener, cfg: RelayConfig) -> anyhow::Result<()> {
    let (tx, _rx) = broadcast::channel(BROADCAST_CAPACITY);
    let state: SharedState = Arc::new(Mutex::new(RelayState::new()));
    let ping_every = Duration::from_secs(cfg.ping_interval_secs.max(1));

    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                tokio::spawn(handle_connection(stream, peer, tx.clone(), state.clone(), ping_every));
            }
            Err(e) => {
                warn!(error = %e, "Accept failed");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    tx: broadcast::Sender<String>,
    state: SharedState,
    ping_every: Duration,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!(%peer, error = %e, "WebSocket handshake failed");
            return;
        }
    };

    let (mut write, mut read) = ws_stream.split();
    // Subscribe before the snapshot so no move slips between the two.
    let mut rx = tx.subscribe();

    let init = GameMessage::Init { units: lock(&state).units().to_vec() };
    let init = match init.to_json() {
        Ok(json) => json,
        Err(e) => {
            warn!(%peer, error = %e, "Failed to encode init");
            return;
        }
    };
    if let Err(e) = write.send(Message::Text(init)).await {
        warn!(%peer, error = %e, "Failed to send init");
        return;
    }
    info!(%peer, "Client connected");

    // Heartbeat
    let mut heartbeat = interval_at(Instant::now() + ping_every, ping_every);

    let mut send_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                msg = rx.recv() => match msg {
                    Ok(text) => {
                        if write.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(%peer, skipped, "Client fell behind broadcast");
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = heartbeat.tick() => {
                    if write.send(Message::Ping(Vec::new())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    let recv_state = state.clone();
    let recv_tx = tx.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(frame) = read.next().await {
            match frame {
                Ok(Message::Text(text)) => handle_text(&text, peer, &recv_state, &recv_tx),
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!(%peer, error = %e, "WebSocket read failed");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    info!(%peer, "Client disconnected");
}

fn handle_text(text: &str, peer: SocketAddr, state: &SharedState, tx: &broadcast::Sender<String>) {
    match serde_json::from_str::<GameMessage>(text) {
        Ok(GameMessage::MoveUnit { unit_id, x, y, z }) => {
            if !lock(state).record_move(unit_id, Position { x, y, z }) {
                warn!(%peer, unit_id, max = MAX_UNITS, "Dropping move for out-of-range unit");
                return;
            }

            match (GameMessage::MoveUnit { unit_id, x, y, z }).to_json() {
                Ok(json) => {
                    // No receivers is fine.
                    let _ = tx.send(json);
                    debug!(%peer, unit_id, x, y, z, "Relayed move");
                }
                Err(e) => warn!(%peer, error = %e, "Failed to encode move"),
            }
        }
        Ok(GameMessage::Hello { msg }) => {
            info!(%peer, %msg, "Client said hello");
        }
        Ok(other) => {
            debug!(%peer, ?other, "Ignoring client message");
        }
        Err(e) => {
            warn!(%peer, error = %e, "Malformed client message");
        }
    }
}
