use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use sh_core::errors::{DomainError, TokenError};
use sh_shared::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Generic message for any rejected token; never says which check failed
const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid or missing credentials";

const EXPIRED_MESSAGE: &str = "Session expired. Please sign in again";

/// Authentication failures surfaced by the HTTP layer
#[derive(Error, Debug)]
pub enum ApiAuthError {
    #[error("Missing or invalid Authorization header")]
    MissingCredentials,

    #[error(transparent)]
    Rejected(#[from] DomainError),
}

impl ApiAuthError {
    /// Token error behind this failure, if any
    pub fn token_error(&self) -> Option<&TokenError> {
        match self {
            ApiAuthError::Rejected(err) => err.as_token_error(),
            ApiAuthError::MissingCredentials => None,
        }
    }

    /// Error code sent to the client
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiAuthError::MissingCredentials => error_codes::UNAUTHORIZED,
            ApiAuthError::Rejected(_) => match self.token_error() {
                Some(err) if err.is_expired() => error_codes::TOKEN_EXPIRED,
                Some(err) if err.is_rejection() => error_codes::TOKEN_INVALID,
                _ => error_codes::INTERNAL_ERROR,
            },
        }
    }

    fn challenge(&self) -> &'static str {
        match self.error_code() {
            error_codes::TOKEN_EXPIRED => {
                r#"Bearer error="invalid_token", error_description="The access token expired""#
            }
            error_codes::TOKEN_INVALID => r#"Bearer error="invalid_token""#,
            _ => "Bearer",
        }
    }
}

impl ResponseError for ApiAuthError {
    fn status_code(&self) -> StatusCode {
        match self.error_code() {
            error_codes::INTERNAL_ERROR => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if self.status_code() == StatusCode::UNAUTHORIZED {
            builder.insert_header((header::WWW_AUTHENTICATE, self.challenge()));
        }
        builder.json(self.to_error_response())
    }
}

impl IntoErrorResponse for ApiAuthError {
    fn to_error_response(&self) -> ErrorResponse {
        let code = self.error_code();
        match code {
            // Expired sessions carry a sign-in-again hint
            error_codes::TOKEN_EXPIRED => {
                ErrorResponse::new(code, EXPIRED_MESSAGE).add_detail("reauthenticate", true)
            }
            error_codes::INTERNAL_ERROR => ErrorResponse::new(code, "An internal error occurred"),
            _ => ErrorResponse::new(code, INVALID_CREDENTIALS_MESSAGE),
        }
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    let error = ApiAuthError::from(error);
    if error.status_code().is_server_error() {
        log::error!("Domain Error: {:?}", error);
    }
    error.error_response()
}
