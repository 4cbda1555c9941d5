//! Helpers shared by gateway integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)]

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::ws::Message;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tokio::sync::mpsc;

use actionsock_core::protocol::Envelope;
use actionsock_gateway::auth::TokenValidator;
use actionsock_gateway::config::AuthConfig;
use actionsock_gateway::realtime::Connection;

pub const SECRET: &str = "test-secret-key-that-is-long-enough";

pub fn now() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as i64
}

/// HS256 token carrying `user`, expiring `ttl_secs` from now (negative = already expired).
pub fn mint(secret: &str, user: Value, ttl_secs: i64) -> String {
    mint_claims(secret, json!({ "user": user, "iat": now(), "exp": now() + ttl_secs }))
}

pub fn mint_claims(secret: &str, claims: Value) -> String {
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
}

pub fn validator() -> Arc<TokenValidator> {
    Arc::new(TokenValidator::new(&AuthConfig::default(), Some(SECRET.to_string())).unwrap())
}

/// A detached connection plus the receiving end of its queue.
pub fn connection(id: u64) -> (Connection, mpsc::Receiver<Message>) {
    let (tx, rx) = mpsc::channel(16);
    (Connection::new(id, tx), rx)
}

/// Next queued envelope, if any.
pub fn next_envelope(rx: &mut mpsc::Receiver<Message>) -> Option<Envelope> {
    match rx.try_recv().ok()? {
        Message::Text(s) => Some(Envelope::from_json(&s).unwrap()),
        other => panic!("unexpected frame: {other:?}"),
    }
}
