//! actionsock gateway library entry.
//!
//! This crate wires the token validator, handler registry, dispatcher, and
//! WebSocket transport into a gateway stack. It is consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod auth;
pub mod config;
pub mod dispatch;
pub mod realtime;
pub mod router;
pub mod services;
pub mod transport;
