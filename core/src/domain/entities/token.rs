//! Token entities for JWT-based session authentication.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::TokenError;

/// Subject claim (username)
pub const CLAIM_SUBJECT: &str = "sub";

/// Custom user id claim
pub const CLAIM_USER_ID: &str = "userId";

/// Issued-at claim
pub const CLAIM_ISSUED_AT: &str = "iat";

/// Expiration claim
pub const CLAIM_EXPIRES_AT: &str = "exp";

/// Claims structure for the session token payload
///
/// Timestamps are JWT NumericDate values (seconds since the epoch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (username)
    pub sub: String,

    /// Principal identifier
    #[serde(rename = "userId")]
    pub user_id: i64,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,
}

impl SessionClaims {
    /// Creates claims for a session issued at `issued_at` and valid for `validity`
    ///
    /// Fails with `TokenGenerationFailed` when the expiry falls outside the
    /// representable calendar range.
    pub fn new(
        subject: impl Into<String>,
        user_id: i64,
        issued_at: DateTime<Utc>,
        validity: chrono::Duration,
    ) -> Result<Self, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(validity)
            .ok_or(TokenError::TokenGenerationFailed)?;
        Ok(Self {
            sub: subject.into(),
            user_id,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    /// Reads every claim out of a verified payload
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, TokenError> {
        Ok(Self {
            sub: read_subject(payload)?,
            user_id: read_integer(payload, CLAIM_USER_ID)?,
            iat: read_integer(payload, CLAIM_ISSUED_AT)?,
            exp: read_integer(payload, CLAIM_EXPIRES_AT)?,
        })
    }

    /// Issued-at as a calendar timestamp
    pub fn issued_at(&self) -> Result<DateTime<Utc>, TokenError> {
        timestamp_to_datetime(self.iat, CLAIM_ISSUED_AT)
    }

    /// Expiry as a calendar timestamp
    pub fn expires_at(&self) -> Result<DateTime<Utc>, TokenError> {
        timestamp_to_datetime(self.exp, CLAIM_EXPIRES_AT)
    }

    /// `true` once `now` has reached the expiry
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }

    /// `true` while `now` is strictly before the expiry
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() < self.exp
    }
}

/// Outcome of checking an authentic token against an expected identity
///
/// Forged or malformed tokens never produce a status; they surface as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenStatus {
    /// Signature intact, subject matches, not yet expired
    Valid,
    /// Signature intact, subject matches, past expiry
    Expired,
    /// Signature intact but issued to someone else
    SubjectMismatch,
}

impl TokenStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenStatus::Valid)
    }
}

pub(crate) fn read_subject(payload: &Map<String, Value>) -> Result<String, TokenError> {
    match payload.get(CLAIM_SUBJECT) {
        None | Some(Value::Null) => Err(TokenError::claim_missing(CLAIM_SUBJECT)),
        Some(Value::String(sub)) => Ok(sub.clone()),
        Some(_) => Err(TokenError::claim_type_mismatch(CLAIM_SUBJECT)),
    }
}

pub(crate) fn read_integer(payload: &Map<String, Value>, claim: &str) -> Result<i64, TokenError> {
    match payload.get(claim) {
        None | Some(Value::Null) => Err(TokenError::claim_missing(claim)),
        Some(value) => value
            .as_i64()
            .ok_or_else(|| TokenError::claim_type_mismatch(claim)),
    }
}

pub(crate) fn read_timestamp(
    payload: &Map<String, Value>,
    claim: &str,
) -> Result<DateTime<Utc>, TokenError> {
    let secs = read_integer(payload, claim)?;
    timestamp_to_datetime(secs, claim)
}

fn timestamp_to_datetime(secs: i64, claim: &str) -> Result<DateTime<Utc>, TokenError> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| TokenError::claim_type_mismatch(claim))
}
