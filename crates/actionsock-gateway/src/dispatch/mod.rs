//! Dispatcher module exports.
//!
//! Re-exports the dispatcher, the registry, and the handler function type so
//! downstream consumers can depend on this module directly.

pub mod dispatcher;
pub mod registry;

pub use dispatcher::{Dispatcher, MessageProcessor};
pub use registry::{Handler, HandlerEntry, HandlerFuture, HandlerRegistry, RegistryBuilder};
