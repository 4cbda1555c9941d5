//! Handler registry: derived action key -> (auth requirement, handler).
//!
//! Built once at startup with [`RegistryBuilder`], read-only afterwards.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::Value;

use actionsock_core::error::{ActionSockError, Result};
use actionsock_core::protocol::Envelope;
use actionsock_core::{action_key, Action, SubAction};

use crate::auth::User;
use crate::realtime::Connection;

/// Future returned by every handler.
pub type HandlerFuture = BoxFuture<'static, Result<Option<Envelope>>>;

/// A handler receives the connection, the envelope payload, and the user from
/// the validated token (`None` when authentication was skipped). It may return
/// an envelope to send back on the same connection.
pub type Handler = Arc<dyn Fn(Connection, Option<Value>, Option<User>) -> HandlerFuture + Send + Sync>;

/// One registry entry.
///
/// `requires_auth` is tri-state and only an explicit `Some(false)` opts out of
/// authentication. `None` (the default) is treated the same as `Some(true)`, so
/// a handler whose author never set the flag is gated.
#[derive(Clone)]
pub struct HandlerEntry {
    requires_auth: Option<bool>,
    handler: Handler,
}

impl HandlerEntry {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Connection, Option<Value>, Option<User>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Envelope>>> + Send + 'static,
    {
        Self {
            requires_auth: None,
            handler: Arc::new(move |conn: Connection, payload: Option<Value>, user: Option<User>| -> HandlerFuture {
                Box::pin(f(conn, payload, user))
            }),
        }
    }

    pub fn requires_auth(mut self, required: bool) -> Self {
        self.requires_auth = Some(required);
        self
    }

    /// Shorthand for `requires_auth(false)`.
    pub fn no_auth(self) -> Self {
        self.requires_auth(false)
    }

    pub fn auth_flag(&self) -> Option<bool> {
        self.requires_auth
    }

    /// True unless the flag is explicitly `false`.
    pub fn is_gated(&self) -> bool {
        self.requires_auth != Some(false)
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }
}

impl fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("requires_auth", &self.requires_auth)
            .finish_non_exhaustive()
    }
}

/// Immutable key -> entry map.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    entries: HashMap<String, HandlerEntry>,
}

impl HandlerRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Build from a key -> entry listing. Duplicate keys are a `Config` error.
    pub fn from_entries<I, K>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, HandlerEntry)>,
        K: Into<String>,
    {
        let mut b = RegistryBuilder::default();
        for (key, entry) in entries {
            b.insert_key(key, entry)?;
        }
        Ok(b.build())
    }

    pub fn get(&self, key: &str) -> Option<&HandlerEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: HashMap<String, HandlerEntry>,
}

impl RegistryBuilder {
    /// Register under the key derived from `action` / `sub_action`.
    pub fn register(
        &mut self,
        action: Action,
        sub_action: Option<SubAction>,
        entry: HandlerEntry,
    ) -> Result<&mut Self> {
        self.insert_key(action_key(action, sub_action), entry)
    }

    /// Register under an explicit key, e.g. `handleZoneJoin`.
    pub fn insert_key(&mut self, key: impl Into<String>, entry: HandlerEntry) -> Result<&mut Self> {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return Err(ActionSockError::Config(format!("duplicate handler key: {key}")));
        }
        self.entries.insert(key, entry);
        Ok(self)
    }

    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            entries: self.entries,
        }
    }
}
