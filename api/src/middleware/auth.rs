//! Bearer-token authentication middleware for protecting API endpoints.
//!
//! This middleware extracts the session token from the Authorization header,
//! verifies it through the core token service, and injects the verified
//! identity into the request. Token failures are logged here, at the edge:
//! forged or malformed tokens as warnings, expired ones at debug level.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use chrono::{DateTime, Utc};
use futures_util::future::LocalBoxFuture;
use sh_core::{
    domain::entities::token::SessionClaims,
    errors::DomainError,
    services::token::{Clock, TokenService},
};
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use crate::handlers::error::ApiAuthError;

/// Verified identity injected into requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Username the token was issued to
    pub subject: String,
    /// Principal identifier
    pub user_id: i64,
    /// When the session runs out
    pub expires_at: DateTime<Utc>,
}

impl AuthContext {
    /// Creates an authentication context from verified claims
    ///
    /// Fails when `exp` is not a representable instant.
    pub fn from_claims(claims: SessionClaims) -> Result<Self, DomainError> {
        let expires_at = claims.expires_at()?;
        Ok(Self {
            subject: claims.sub,
            user_id: claims.user_id,
            expires_at,
        })
    }
}

/// Trait for wrapping TokenService to allow dynamic dispatch
pub trait TokenVerifier: Send + Sync {
    fn authenticate(&self, token: &str) -> Result<SessionClaims, DomainError>;
}

impl<C: Clock> TokenVerifier for TokenService<C> {
    fn authenticate(&self, token: &str) -> Result<SessionClaims, DomainError> {
        TokenService::authenticate(self, token)
    }
}

/// Session authentication middleware factory
#[derive(Clone)]
pub struct SessionAuth {
    verifier: Arc<dyn TokenVerifier>,
}

impl SessionAuth {
    /// Creates a new middleware backed by the given verifier
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthMiddleware {
            service: Rc::new(service),
            verifier: Arc::clone(&self.verifier),
        }))
    }
}

/// Session authentication middleware service
pub struct SessionAuthMiddleware<S> {
    service: Rc<S>,
    verifier: Arc<dyn TokenVerifier>,
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let verifier = Arc::clone(&self.verifier);

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => return Err(Error::from(ApiAuthError::MissingCredentials)),
            };

            let context = match verifier
                .authenticate(&token)
                .and_then(AuthContext::from_claims)
            {
                Ok(context) => context,
                Err(e) => {
                    log_rejection(&req, &e);
                    return Err(Error::from(ApiAuthError::from(e)));
                }
            };

            req.extensions_mut().insert(context);

            service.call(req).await
        })
    }
}

fn log_rejection(req: &ServiceRequest, error: &DomainError) {
    let peer = req
        .connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string();

    match error.as_token_error() {
        Some(err) if err.is_attack_signal() => {
            log::warn!("Rejected forged or malformed token from {}: {}", peer, err);
        }
        Some(err) if err.is_expired() => {
            log::debug!("Expired session token from {}", peer);
        }
        Some(err) => log::info!("Rejected session token from {}: {}", peer, err),
        None => log::error!("Token verification failed: {:?}", error),
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|s| s.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| Error::from(ApiAuthError::MissingCredentials));

        ready(result)
    }
}

/// Extractor for optional authentication
pub struct OptionalAuth(pub Option<AuthContext>);

impl FromRequest for OptionalAuth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let auth = req.extensions().get::<AuthContext>().cloned();
        ready(Ok(OptionalAuth(auth)))
    }
}
