//! API error type and its HTTP mapping.
//!
//! Every `/api` failure renders as `{"detail": "<message>"}` with the status
//! below. Messages for missing or duplicate records are user-facing pt-BR.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog::ValidationError;
use uuid::Uuid;

use crate::rate_limit::RateLimitError;
use crate::services::jwks::AuthError;
use crate::services::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    TooManyRequests(String),
    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn category_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("Categoria '{id}' não encontrada."))
    }

    pub(crate) fn user_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("Usuário '{id}' não encontrado."))
    }

    pub(crate) fn product_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("Produto '{id}' não encontrado."))
    }

    /// Store failures on product routes: a dangling category reference is a
    /// bad request body, not a missing resource.
    pub(crate) fn from_product_store(err: StoreError) -> Self {
        match err {
            StoreError::CategoryNotFound(id) => Self::Unprocessable(format!("Categoria '{id}' não encontrada.")),
            other => other.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::CategoryNotFound(id) => Self::category_not_found(id),
            StoreError::ProductNotFound(id) => Self::product_not_found(id),
            StoreError::DuplicateCategory(name) => Self::Conflict(format!("Categoria com nome '{name}' já existe.")),
            StoreError::UserNotFound(id) => Self::user_not_found(id),
            StoreError::DuplicateEmail(email) => Self::Conflict(format!("Usuário com email '{email}' já existe.")),
            StoreError::DuplicateKeycloakId(id) => {
                Self::Conflict(format!("Usuário com identificador '{id}' já existe."))
            }
            StoreError::Database(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Unprocessable(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match &err {
            AuthError::Jwks(e) => tracing::warn!(error = %e, "jwks unavailable; rejecting token"),
            other => tracing::debug!(error = %other, "bearer token rejected"),
        }
        Self::Unauthorized("Não autenticado.".to_owned())
    }
}

impl From<RateLimitError> for ApiError {
    fn from(err: RateLimitError) -> Self {
        let RateLimitError::Exceeded { class, .. } = &err;
        tracing::info!(?class, error = %err, "rate limited");
        Self::TooManyRequests(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Internal(cause) = &self {
            tracing::error!(error = %cause, "request failed");
        }
        (status, Json(serde_json::json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Parse a path id; malformed ids are reported like missing ones.
pub(crate) fn parse_id(raw: &str, not_found: fn(&str) -> ApiError) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| not_found(raw))
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
