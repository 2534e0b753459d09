//! Domain entities representing core business objects.

pub mod token;


// Re-export commonly used types
pub use token::{
    SessionClaims, TokenStatus,
    CLAIM_SUBJECT, CLAIM_USER_ID, CLAIM_ISSUED_AT, CLAIM_EXPIRES_AT,
};
