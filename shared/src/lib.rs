//! Shared utilities and common types for SprintHacking server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error response structures and codes

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{AuthConfig, JwtConfig};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
