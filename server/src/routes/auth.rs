//! Bearer-token authentication for `/api` routes.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::error::ApiError;
use crate::rate_limit::RateClass;
use crate::services::jwks::{AuthError, Identity};
use crate::state::AppState;

/// Token from an `Authorization: Bearer <token>` header value.
pub(crate) fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Caller resolved from a verified bearer token.
/// Use as a handler parameter to require authentication.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub identity: Identity,
}

impl AuthUser {
    /// Draw one request from the caller's `class` budget.
    ///
    /// # Errors
    ///
    /// Returns 429 when the caller's window for `class` is full.
    pub fn admit(&self, state: &AppState, class: RateClass) -> Result<(), ApiError> {
        state.rate_limiter.check_and_record(&self.identity.subject, class).map_err(|e| {
            tracing::debug!(subject = %self.identity.subject, "request over budget");
            ApiError::from(e)
        })
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let header = parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        let token = match header.and_then(bearer_token) {
            Some(token) => token,
            None if app_state.verifier.is_bypass() => "",
            None => return Err(AuthError::MissingToken.into()),
        };
        let identity = app_state.verifier.verify(token).await?;
        tracing::debug!(
            subject = %identity.subject,
            email = ?identity.email,
            name = ?identity.name,
            "request authenticated"
        );
        Ok(Self { identity })
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
