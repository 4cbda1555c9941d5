use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use actionsock_core::error::ActionSockError;
use actionsock_core::protocol::Envelope;
use actionsock_core::{Action, SubAction};

use crate::dispatch::HandlerEntry;
use crate::realtime::ConnectionRegistry;

use super::{non_empty, parse_payload};

#[derive(Debug, Deserialize)]
struct SendReq {
    zone: String,
    text: String,
}

/// `handleMessageSend`: relay text to the other members of a zone the sender
/// has joined, and acknowledge with the delivery count.
pub fn message_send_handler(connections: Arc<ConnectionRegistry>) -> HandlerEntry {
    HandlerEntry::new(move |conn, payload, user| {
        let connections = Arc::clone(&connections);
        async move {
            let user = user.ok_or(ActionSockError::NotAuthenticated)?;
            let req: SendReq = parse_payload(payload, "message.send")?;
            let zone = non_empty(&req.zone, "zone")?;
            let text = non_empty(&req.text, "text")?;

            if !connections.zones().is_member(zone, conn.id()) {
                return Err(ActionSockError::BadRequest(format!(
                    "message.send requires joining zone {zone} first"
                )));
            }

            let out = Envelope::new(Action::Message)
                .with_sub_action(SubAction::Send)
                .with_payload(json!({ "zone": zone, "from": user, "text": text }));
            let delivered = connections.broadcast_zone(zone, &out, Some(conn.id()));

            Ok::<_, ActionSockError>(Some(
                Envelope::new(Action::Message)
                    .with_sub_action(SubAction::Send)
                    .with_message("sent")
                    .with_payload(json!({ "zone": zone, "delivered": delivered })),
            ))
        }
    })
}
