//! Token service module for JWT session management
//!
//! This module handles all token-related operations including:
//! - HS256 session token issuance
//! - Signature verification and claim extraction
//! - Expiry and identity validation
//! - Signing key generation or injection

mod clock;
mod config;
mod key_manager;
mod service;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{KeySource, TokenServiceConfig, MAX_VALIDITY_WINDOW_SECS, MIN_KEY_BITS};
pub use key_manager::SigningKey;
pub use service::TokenService;
