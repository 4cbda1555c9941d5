//! Shared application state for the actionsock gateway.
//!
//! Startup builds the token validator, the connection registry, and the
//! handler registry once; a missing token secret fails here instead of on the
//! first authenticated message.

use std::sync::Arc;

use actionsock_core::error::Result;

use crate::auth::TokenValidator;
use crate::config::GatewayConfig;
use crate::dispatch::Dispatcher;
use crate::realtime::ConnectionRegistry;
use crate::services;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    dispatcher: Dispatcher,
    connections: Arc<ConnectionRegistry>,
}

impl AppState {
    /// Build application state, reading the token secret from the environment
    /// variable named by `auth.secret_env`.
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let validator = TokenValidator::from_env(&cfg.auth)?;
        Self::with_validator(cfg, Arc::new(validator))
    }

    /// Build application state around an already constructed validator.
    pub fn with_validator(cfg: GatewayConfig, validator: Arc<TokenValidator>) -> Result<Self> {
        let connections = Arc::new(ConnectionRegistry::new());
        let registry = services::builtin_registry(Arc::clone(&validator), Arc::clone(&connections))?;

        tracing::info!(handlers = ?registry.keys(), "handler registry built");

        let dispatcher = Dispatcher::new(registry).with_validator(validator);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                dispatcher,
                connections,
            }),
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    pub fn connections(&self) -> &ConnectionRegistry {
        &self.inner.connections
    }
}
