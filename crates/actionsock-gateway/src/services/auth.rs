use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use actionsock_core::error::ActionSockError;
use actionsock_core::protocol::Envelope;
use actionsock_core::Action;

use crate::auth::TokenValidator;
use crate::dispatch::HandlerEntry;
use crate::realtime::ConnectionRegistry;

use super::parse_payload;

#[derive(Debug, Deserialize)]
struct AuthReq {
    token: String,
}

/// `handleAuth`: the dispatcher never gates the auth action, so the token
/// arrives in the payload and is checked here. On success the connection is
/// bound to the token's user.
pub fn auth_handler(validator: Arc<TokenValidator>, connections: Arc<ConnectionRegistry>) -> HandlerEntry {
    HandlerEntry::new(move |conn, payload, _user| {
        let validator = Arc::clone(&validator);
        let connections = Arc::clone(&connections);
        async move {
            let req: AuthReq = parse_payload(payload, "auth")?;
            let claims = validator.validate(&req.token)?;

            connections.set_user(conn.id(), claims.user.clone());
            tracing::info!(conn = conn.id(), user = ?claims.user.id(), "connection authenticated");

            Ok::<_, ActionSockError>(Some(
                Envelope::new(Action::Auth)
                    .with_message("authenticated")
                    .with_payload(json!({ "user": claims.user, "exp": claims.exp })),
            ))
        }
    })
}
