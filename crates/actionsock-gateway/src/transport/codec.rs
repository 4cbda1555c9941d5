//! Decode-once codec for the transport layer.
//!
//! - Text frames => Envelope
//! - Binary frames are rejected (the wire contract is JSON only)
//! - Ping/Pong/Close are surfaced for lifecycle management

use axum::extract::ws::Message;
use actionsock_core::{
    error::{ActionSockError, Result},
    protocol::Envelope,
};

#[derive(Debug)]
pub enum Inbound {
    Text { env: Envelope, bytes_len: usize },
    Ping(Vec<u8>),
    Pong(Vec<u8>),
    Close,
}

pub fn decode(msg: Message) -> Result<Inbound> {
    match msg {
        Message::Text(s) => {
            let bytes_len = s.len();
            let env = Envelope::from_json(&s)?;
            Ok(Inbound::Text { env, bytes_len })
        }
        Message::Binary(_) => Err(ActionSockError::BadRequest(
            "binary frames are not supported".into(),
        )),
        Message::Ping(v) => Ok(Inbound::Ping(v)),
        Message::Pong(v) => Ok(Inbound::Pong(v)),
        Message::Close(_) => Ok(Inbound::Close),
    }
}

/// Encode an outbound envelope as a text frame.
pub fn encode(env: &Envelope) -> Result<Message> {
    Ok(Message::Text(env.to_json()?))
}

/// Frame length before decoding, for the size limit.
pub fn frame_len(msg: &Message) -> usize {
    match msg {
        Message::Text(s) => s.len(),
        Message::Binary(b) => b.len(),
        Message::Ping(v) => v.len(),
        Message::Pong(v) => v.len(),
        Message::Close(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actionsock_core::{Action, SubAction};

    #[test]
    fn text_frame_decodes_to_envelope() {
        let msg = Message::Text(r#"{"action":"ZONE","subAction":"JOIN","payload":{"zone":"lobby"}}"#.into());
        match decode(msg).unwrap() {
            Inbound::Text { env, bytes_len } => {
                assert_eq!(env.action, Action::Zone);
                assert_eq!(env.sub_action, Some(SubAction::Join));
                assert!(bytes_len > 0);
            }
            other => panic!("unexpected inbound: {other:?}"),
        }
    }

    #[test]
    fn binary_frame_is_bad_request() {
        let err = decode(Message::Binary(vec![1, 2, 3])).unwrap_err();
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
    }

    #[test]
    fn error_envelope_encodes_as_text() {
        let env = Envelope::from_error(&ActionSockError::NotAuthenticated);
        let Message::Text(s) = encode(&env).unwrap() else {
            panic!("expected text frame");
        };
        assert!(s.contains("\"NOT_AUTHENTICATED\""));
        assert!(s.contains("\"action\":\"ERROR\""));
    }
}
