use std::sync::Arc;

use futures_util::future::BoxFuture;

use actionsock_core::error::{ActionSockError, Result};
use actionsock_core::protocol::Envelope;
use actionsock_core::{action_key, AUTH_ACTION};

use crate::auth::{TokenValidator, User};
use crate::dispatch::registry::HandlerRegistry;
use crate::realtime::Connection;

/// Boxed message-processing function, for hosts that want a plain callable.
pub type MessageProcessor =
    Arc<dyn Fn(Connection, Envelope) -> BoxFuture<'static, Result<Option<Envelope>>> + Send + Sync>;

/// Routes envelopes to registry entries, authenticating gated actions first.
///
/// Errors are returned untouched; turning them into `ERROR` envelopes is the
/// transport's job.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    validator: Option<Arc<TokenValidator>>,
}

impl Dispatcher {
    /// A dispatcher without a validator rejects every gated action with a
    /// `Config` error.
    pub fn new(registry: HandlerRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            validator: None,
        }
    }

    pub fn with_validator(mut self, validator: Arc<TokenValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub async fn dispatch(&self, conn: Connection, env: Envelope) -> Result<Option<Envelope>> {
        let Envelope {
            auth,
            action,
            sub_action,
            payload,
            ..
        } = env;

        let key = action_key(action, sub_action);
        let Some(entry) = self.registry.get(&key) else {
            tracing::warn!(conn = conn.id(), %key, "unknown action");
            return Err(ActionSockError::UnknownAction(key));
        };

        let gated = action != AUTH_ACTION && entry.is_gated();
        let user = if gated {
            Some(self.authenticate(auth.as_deref()).map_err(|e| {
                tracing::warn!(conn = conn.id(), %key, error = %e, "dispatch rejected");
                e
            })?)
        } else {
            None
        };

        tracing::debug!(conn = conn.id(), %key, authenticated = gated, "dispatch");
        let handler = Arc::clone(entry.handler());
        handler(conn, payload, user).await
    }

    fn authenticate(&self, auth: Option<&str>) -> Result<User> {
        let token = auth
            .filter(|t| !t.trim().is_empty())
            .ok_or(ActionSockError::NotAuthenticated)?;
        let validator = self
            .validator
            .as_ref()
            .ok_or_else(|| ActionSockError::Config("token secret is not configured".into()))?;
        Ok(validator.validate(token)?.user)
    }

    /// Wrap into a [`MessageProcessor`].
    pub fn into_processor(self) -> MessageProcessor {
        let this = Arc::new(self);
        Arc::new(move |conn: Connection, env: Envelope| -> BoxFuture<'static, Result<Option<Envelope>>> {
            let this = Arc::clone(&this);
            Box::pin(async move { this.dispatch(conn, env).await })
        })
    }
}
