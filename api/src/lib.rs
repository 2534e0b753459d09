//! HTTP adapter for session token authentication
//!
//! Request-authentication middleware that turns an `Authorization: Bearer`
//! header into a verified [`middleware::auth::AuthContext`], and the mapping
//! of token failures onto 401 responses.

pub mod handlers;
pub mod middleware;
