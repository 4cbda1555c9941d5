//! Wire protocol (JSON text frames).
//!
//! All parsers are panic-free: malformed input is reported as
//! `ActionSockError::BadRequest` instead of panicking.

pub mod envelope;

pub use envelope::{Envelope, ErrorInfo};
