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
struct ZoneReq {
    zone: String,
}

/// `handleZoneJoin`: add the connection to a zone and tell the other members.
pub fn zone_join_handler(connections: Arc<ConnectionRegistry>) -> HandlerEntry {
    HandlerEntry::new(move |conn, payload, user| {
        let connections = Arc::clone(&connections);
        async move {
            let req: ZoneReq = parse_payload(payload, "zone.join")?;
            let zone = non_empty(&req.zone, "zone")?;

            if connections.zones().join(zone, conn.id()) {
                let notice = Envelope::new(Action::Presence)
                    .with_sub_action(SubAction::Join)
                    .with_payload(json!({ "zone": zone, "user": user }));
                connections.broadcast_zone(zone, &notice, Some(conn.id()));
            }

            let members = connections.zones().members(zone).len();
            Ok::<_, ActionSockError>(Some(
                Envelope::new(Action::Zone)
                    .with_sub_action(SubAction::Join)
                    .with_payload(json!({ "zone": zone, "members": members })),
            ))
        }
    })
}

/// `handleZoneLeave`: leaving a zone the connection never joined is a no-op.
pub fn zone_leave_handler(connections: Arc<ConnectionRegistry>) -> HandlerEntry {
    HandlerEntry::new(move |conn, payload, user| {
        let connections = Arc::clone(&connections);
        async move {
            let req: ZoneReq = parse_payload(payload, "zone.leave")?;
            let zone = non_empty(&req.zone, "zone")?;

            if connections.zones().leave(zone, conn.id()) {
                let notice = Envelope::new(Action::Presence)
                    .with_sub_action(SubAction::Leave)
                    .with_payload(json!({ "zone": zone, "user": user }));
                connections.broadcast_zone(zone, &notice, None);
            }

            Ok::<_, ActionSockError>(Some(
                Envelope::new(Action::Zone)
                    .with_sub_action(SubAction::Leave)
                    .with_payload(json!({ "zone": zone })),
            ))
        }
    })
}
