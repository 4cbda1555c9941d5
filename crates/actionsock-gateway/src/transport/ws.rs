//! WebSocket handler.
//!
//! Responsibilities:
//! - Upgrade HTTP -> WS
//! - Register the socket's outbound queue as a `Connection` (pushes from other
//!   sessions); replies to this socket's own messages are written directly
//! - Lifecycle: ping/pong + idle timeout
//! - Size check, then decode-once, then hand each envelope to the dispatcher
//! - Relay the handler's reply, or an `ERROR` envelope when dispatch fails.
//!   A failed message never ends the session.

use axum::{
    extract::{ws::Message, ws::WebSocket, ws::WebSocketUpgrade, State},
    response::Response,
};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

use actionsock_core::error::{ActionSockError, Result};
use actionsock_core::protocol::Envelope;

use crate::app_state::AppState;
use crate::realtime::Connection;
use crate::transport::codec::{decode, encode, frame_len, Inbound};

const OUTBOUND_QUEUE: usize = 1024;

// --------------------
// Entry
// --------------------
pub async fn ws_upgrade(State(app): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = run_session(app, socket).await {
            tracing::warn!(error = %e, "session ended with error");
        }
    })
}

// --------------------
// Core session loop
// --------------------
async fn run_session(app: AppState, socket: WebSocket) -> Result<()> {
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(OUTBOUND_QUEUE);
    let conn = app.connections().connect(out_tx);
    let conn_id = conn.id();
    tracing::info!(conn = conn_id, "connection opened");

    let res = session_loop(&app, conn, &mut out_rx, socket).await;

    app.connections().disconnect(conn_id);
    tracing::info!(conn = conn_id, "connection closed");
    res
}

async fn session_loop(
    app: &AppState,
    conn: Connection,
    out_rx: &mut mpsc::Receiver<Message>,
    socket: WebSocket,
) -> Result<()> {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let gw = &app.cfg().gateway;
    let ping_every = Duration::from_millis(gw.ping_interval_ms);
    let idle_timeout = Duration::from_millis(gw.idle_timeout_ms);
    let max_frame_bytes = gw.max_frame_bytes;

    let mut ping_tick = tokio::time::interval(ping_every);
    ping_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut last_activity = Instant::now();
    let dispatcher = app.dispatcher();

    loop {
        tokio::select! {
            // outbound writer
            maybe_out = out_rx.recv() => {
                match maybe_out {
                    Some(m) => {
                        if ws_tx.send(m).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }

            // inbound reader
            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break; };
                let Ok(msg) = incoming else { break; };

                last_activity = Instant::now();

                if frame_len(&msg) > max_frame_bytes {
                    reply_error(&mut ws_tx, &ActionSockError::PayloadTooLarge).await?;
                    continue;
                }

                let env = match decode(msg) {
                    Ok(Inbound::Text { env, .. }) => env,
                    Ok(Inbound::Ping(payload)) => {
                        if ws_tx.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                        continue;
                    }
                    Ok(Inbound::Pong(_)) => continue,
                    Ok(Inbound::Close) => break,
                    Err(e) => {
                        reply_error(&mut ws_tx, &e).await?;
                        continue;
                    }
                };

                match dispatcher.dispatch(conn.clone(), env).await {
                    Ok(Some(reply)) => send(&mut ws_tx, &reply).await?,
                    Ok(None) => {}
                    Err(e) => reply_error(&mut ws_tx, &e).await?,
                }
            }

            // ping
            _ = ping_tick.tick() => {
                if ws_tx.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            }

            // idle timeout
            _ = tokio::time::sleep(Duration::from_millis(250)) => {
                if last_activity.elapsed() >= idle_timeout {
                    let _ = reply_error(&mut ws_tx, &ActionSockError::IdleTimeout).await;
                    break;
                }
            }
        }
    }

    // flush whatever is already queued
    while let Ok(m) = out_rx.try_recv() {
        if ws_tx.send(m).await.is_err() {
            break;
        }
    }

    Ok(())
}

type WsSink = SplitSink<WebSocket, Message>;

async fn send(ws_tx: &mut WsSink, env: &Envelope) -> Result<()> {
    ws_tx
        .send(encode(env)?)
        .await
        .map_err(|e| ActionSockError::Internal(format!("socket write failed: {e}")))
}

async fn reply_error(ws_tx: &mut WsSink, err: &ActionSockError) -> Result<()> {
    tracing::debug!(code = err.client_code().as_str(), error = %err, "replying with error envelope");
    send(ws_tx, &Envelope::from_error(err)).await
}
