//! # SprintHacking Core
//!
//! Core logic for signed session tokens: issuing HS256 JWTs that bind a
//! username and user id to a validity window, and verifying them again.

pub mod domain;
pub mod services;
pub mod errors;

// Re-export commonly used types for convenience
pub use domain::*;
pub use services::*;
pub use errors::*;
