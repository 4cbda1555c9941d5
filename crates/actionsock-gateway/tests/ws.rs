//! End-to-end session tests: a real server on an ephemeral port and a
//! WebSocket client talking JSON envelopes to it.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use actionsock_gateway::app_state::AppState;
use actionsock_gateway::{config, router};

use common::{mint, validator, SECRET};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const SMALL_FRAMES: &str = "version: 1\ngateway:\n  max_frame_bytes: 256\n";

async fn serve(yaml: &str) -> SocketAddr {
    let cfg = config::load_from_str(yaml).unwrap();
    let app = router::build_router(AppState::with_validator(cfg, validator()).unwrap());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn client(addr: SocketAddr) -> Client {
    let (ws, _) = connect_async(format!("ws://{addr}/v1/ws")).await.unwrap();
    ws
}

async fn send(ws: &mut Client, frame: Value) {
    ws.send(WsMessage::Text(frame.to_string())).await.unwrap();
}

/// Next text frame as raw JSON, skipping control frames.
async fn recv(ws: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("no frame within 5s")
            .expect("socket closed")
            .unwrap();
        match msg {
            WsMessage::Text(s) => return serde_json::from_str(&s).unwrap(),
            WsMessage::Ping(_) | WsMessage::Pong(_) => continue,
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

fn token(id: &str) -> String {
    mint(SECRET, json!({ "id": id }), 600)
}

fn user_list() -> Value {
    json!({ "action": "USER", "subAction": "LIST" })
}

#[tokio::test]
async fn unknown_action_becomes_error_envelope_and_session_continues() {
    let addr = serve("version: 1\n").await;
    let mut ws = client(addr).await;

    send(&mut ws, json!({ "action": "PRESENCE" })).await;
    let err = recv(&mut ws).await;
    assert_eq!(err["action"], "ERROR");
    assert_eq!(err["error"]["code"], "UNKNOWN_ACTION");
    assert_eq!(err["error"]["message"], "unknown action: handlePresence");
    assert_eq!(err["message"], "unknown action: handlePresence");

    send(&mut ws, user_list()).await;
    let reply = recv(&mut ws).await;
    assert_eq!(reply["action"], "USER");
    assert_eq!(reply["subAction"], "LIST");
    assert_eq!(reply["payload"]["connections"], 1);
}

#[tokio::test]
async fn auth_and_decode_failures_are_reported_per_message() {
    let addr = serve("version: 1\n").await;
    let mut ws = client(addr).await;

    send(&mut ws, json!({ "action": "ZONE", "subAction": "JOIN", "payload": { "zone": "lobby" } })).await;
    assert_eq!(recv(&mut ws).await["error"]["code"], "NOT_AUTHENTICATED");

    send(&mut ws, json!({ "action": "ZONE", "subAction": "JOIN", "auth": "garbage", "payload": { "zone": "lobby" } })).await;
    assert_eq!(recv(&mut ws).await["error"]["code"], "INVALID_TOKEN");

    ws.send(WsMessage::Text("{not json".into())).await.unwrap();
    assert_eq!(recv(&mut ws).await["error"]["code"], "BAD_REQUEST");

    send(
        &mut ws,
        json!({ "action": "ZONE", "subAction": "JOIN", "auth": token("ada"), "payload": { "zone": "lobby" } }),
    )
    .await;
    let reply = recv(&mut ws).await;
    assert_eq!(reply["action"], "ZONE");
    assert_eq!(reply["payload"]["members"], 1);
}

#[tokio::test]
async fn oversized_frame_is_rejected_without_closing_the_session() {
    let addr = serve(SMALL_FRAMES).await;
    let mut ws = client(addr).await;

    let big = json!({ "action": "USER", "subAction": "LIST", "payload": { "pad": "x".repeat(400) } });
    send(&mut ws, big).await;
    let err = recv(&mut ws).await;
    assert_eq!(err["action"], "ERROR");
    assert_eq!(err["error"]["code"], "PAYLOAD_TOO_LARGE");

    send(&mut ws, user_list()).await;
    assert_eq!(recv(&mut ws).await["action"], "USER");
}

#[tokio::test]
async fn zone_messages_reach_other_sockets() {
    let addr = serve("version: 1\n").await;
    let mut ada = client(addr).await;
    let mut bob = client(addr).await;

    for (ws, id) in [(&mut ada, "ada"), (&mut bob, "bob")] {
        send(
            ws,
            json!({ "action": "ZONE", "subAction": "JOIN", "auth": token(id), "payload": { "zone": "lobby" } }),
        )
        .await;
        assert_eq!(recv(ws).await["subAction"], "JOIN");
    }

    let notice = recv(&mut ada).await;
    assert_eq!(notice["action"], "PRESENCE");
    assert_eq!(notice["payload"]["user"]["id"], "bob");

    send(
        &mut ada,
        json!({ "action": "MESSAGE", "subAction": "SEND", "auth": token("ada"), "payload": { "zone": "lobby", "text": "hi" } }),
    )
    .await;
    assert_eq!(recv(&mut ada).await["payload"]["delivered"], 1);

    let relayed = recv(&mut bob).await;
    assert_eq!(relayed["action"], "MESSAGE");
    assert_eq!(relayed["payload"]["text"], "hi");
    assert_eq!(relayed["payload"]["from"]["id"], "ada");
}
