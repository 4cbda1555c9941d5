//! Socket envelope (JSON).
//!
//! One envelope is one message unit in either direction. Inbound envelopes are
//! consumed once by the dispatcher; outbound envelopes are produced by handlers
//! or by [`Envelope::from_error`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::{Action, SubAction};
use crate::error::{ActionSockError, Result};

/// Socket envelope (Text frame).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Envelope {
    /// Bearer token, with or without the `Bearer ` scheme prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_action: Option<SubAction>,
    /// Human-readable text, mostly used on outbound envelopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

/// Error detail carried by `ERROR` envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorInfo {
    /// Stable client code, see [`crate::error::ClientCode`].
    pub code: String,
    pub message: String,
}

impl Envelope {
    pub fn new(action: Action) -> Self {
        Self {
            auth: None,
            action,
            sub_action: None,
            message: None,
            payload: None,
            error: None,
        }
    }

    pub fn with_sub_action(mut self, sub_action: SubAction) -> Self {
        self.sub_action = Some(sub_action);
        self
    }

    pub fn with_auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Build the outbound `ERROR` envelope for a failed dispatch.
    pub fn from_error(err: &ActionSockError) -> Self {
        let message = err.to_string();
        Self {
            error: Some(ErrorInfo {
                code: err.client_code().as_str().to_string(),
                message: message.clone(),
            }),
            ..Self::new(Action::Error).with_message(message)
        }
    }

    /// Parse a text frame. Any shape error is a `BadRequest`.
    pub fn from_json(s: &str) -> Result<Self> {
        let env: Envelope = serde_json::from_str(s)
            .map_err(|e| ActionSockError::BadRequest(format!("invalid envelope json: {e}")))?;
        if let Some(payload) = &env.payload {
            if !payload.is_object() {
                return Err(ActionSockError::BadRequest(
                    "envelope payload must be a JSON object".into(),
                ));
            }
        }
        Ok(env)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ActionSockError::Internal(format!("envelope encode failed: {e}")))
    }
}
