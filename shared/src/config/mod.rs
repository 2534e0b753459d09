//! Configuration module
//!
//! - `auth` - Session token signing and validity configuration

pub mod auth;

pub use auth::{AuthConfig, JwtConfig, DEFAULT_KEY_BITS, DEFAULT_VALIDITY_WINDOW_SECS};
