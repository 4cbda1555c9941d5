//! Top-level facade crate for actionsock.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use actionsock_core::*;
}

pub mod gateway {
    pub use actionsock_gateway::*;
}
