//! Realtime runtime: live connection handles and zone membership.

mod connection;
mod zones;

pub use connection::{Connection, ConnectionRegistry};
pub use zones::Zones;
