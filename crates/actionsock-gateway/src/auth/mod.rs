//! Bearer token verification.
//!
//! Tokens are issued elsewhere; this layer only verifies them and extracts the
//! embedded user object.

pub mod token;

pub use token::{Claims, TokenValidator, User};
