use std::sync::Arc;

use serde_json::{json, Value};

use actionsock_core::error::ActionSockError;
use actionsock_core::protocol::Envelope;
use actionsock_core::{Action, SubAction};

use crate::dispatch::HandlerEntry;
use crate::realtime::ConnectionRegistry;

/// `handleUserList`: public roster of authenticated connections. Opts out of
/// authentication explicitly.
pub fn user_list_handler(connections: Arc<ConnectionRegistry>) -> HandlerEntry {
    HandlerEntry::new(move |_conn, _payload, _user| {
        let connections = Arc::clone(&connections);
        async move {
            let users: Vec<Value> = connections.users().into_iter().map(Value::from).collect();
            Ok::<_, ActionSockError>(Some(
                Envelope::new(Action::User)
                    .with_sub_action(SubAction::List)
                    .with_payload(json!({ "users": users, "connections": connections.len() })),
            ))
        }
    })
    .no_auth()
}
