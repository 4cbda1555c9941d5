//! actionsock core: the socket wire contract, action-key derivation, and the
//! shared error type.
//!
//! This crate defines the JSON envelope exchanged with socket clients, the
//! declared action / sub-action enumerations, and the `handle<Action><SubAction>`
//! key convention that the gateway's handler registry is keyed by. It carries no
//! transport or runtime dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. All fallible paths
//! surface as `ActionSockError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod action;
pub mod error;
pub mod protocol;

pub use action::{action_key, action_key_str, Action, SubAction, AUTH_ACTION};
/// Shared result type.
pub use error::{ActionSockError, ClientCode, Result};
