//! Built-in handlers registered by the gateway binary.
//!
//! | key                 | gated |
//! |---------------------|-------|
//! | `handleAuth`        | never (auth action) |
//! | `handleZoneJoin`    | yes   |
//! | `handleZoneLeave`   | yes   |
//! | `handleMessageSend` | yes   |
//! | `handleUserList`    | no    |

mod auth;
mod message;
mod user;
mod zone;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use actionsock_core::error::{ActionSockError, Result};
use actionsock_core::{Action, SubAction};

use crate::auth::TokenValidator;
use crate::dispatch::HandlerRegistry;
use crate::realtime::ConnectionRegistry;

pub use auth::auth_handler;
pub use message::message_send_handler;
pub use user::user_list_handler;
pub use zone::{zone_join_handler, zone_leave_handler};

/// Registry with every built-in handler.
pub fn builtin_registry(
    validator: Arc<TokenValidator>,
    connections: Arc<ConnectionRegistry>,
) -> Result<HandlerRegistry> {
    let mut b = HandlerRegistry::builder();
    b.register(Action::Auth, None, auth_handler(validator, Arc::clone(&connections)))?
        .register(Action::Zone, Some(SubAction::Join), zone_join_handler(Arc::clone(&connections)))?
        .register(Action::Zone, Some(SubAction::Leave), zone_leave_handler(Arc::clone(&connections)))?
        .register(Action::Message, Some(SubAction::Send), message_send_handler(Arc::clone(&connections)))?
        .register(Action::User, Some(SubAction::List), user_list_handler(connections))?;
    Ok(b.build())
}

fn parse_payload<T: DeserializeOwned>(payload: Option<Value>, what: &str) -> Result<T> {
    let payload = payload
        .ok_or_else(|| ActionSockError::BadRequest(format!("{what} requires payload")))?;
    serde_json::from_value(payload)
        .map_err(|e| ActionSockError::BadRequest(format!("{what} invalid payload: {e}")))
}

fn non_empty<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ActionSockError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(v)
}
