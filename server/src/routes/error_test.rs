use super::*;

use axum::body::to_bytes;
use catalog::{Field, FieldError};

async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn store_errors_map_to_statuses() {
    let id = Uuid::nil();
    assert_eq!(ApiError::from(StoreError::CategoryNotFound(id)).status(), StatusCode::NOT_FOUND);
    assert_eq!(ApiError::from(StoreError::ProductNotFound(id)).status(), StatusCode::NOT_FOUND);
    assert_eq!(ApiError::from(StoreError::DuplicateCategory("x".into())).status(), StatusCode::CONFLICT);
    assert_eq!(
        ApiError::from(StoreError::Database(sqlx::Error::PoolTimedOut)).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn dangling_category_on_product_routes_is_unprocessable() {
    let err = ApiError::from_product_store(StoreError::CategoryNotFound(Uuid::nil()));
    assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let err = ApiError::from_product_store(StoreError::ProductNotFound(Uuid::nil()));
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[test]
fn duplicate_message_names_category() {
    let err = ApiError::from(StoreError::DuplicateCategory("Eletrônicos".into()));
    assert_eq!(err.to_string(), "Categoria com nome 'Eletrônicos' já existe.");
}

#[test]
fn user_errors_map_to_statuses_and_messages() {
    let err = ApiError::from(StoreError::UserNotFound(Uuid::nil()));
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert_eq!(err.to_string(), format!("Usuário '{}' não encontrado.", Uuid::nil()));

    let err = ApiError::from(StoreError::DuplicateEmail("joao@example.com".into()));
    assert_eq!(err.status(), StatusCode::CONFLICT);
    assert_eq!(err.to_string(), "Usuário com email 'joao@example.com' já existe.");

    let err = ApiError::from(StoreError::DuplicateKeycloakId("kc-001".into()));
    assert_eq!(err.status(), StatusCode::CONFLICT);
}

#[test]
fn auth_and_rate_limit_errors_map_to_statuses() {
    assert_eq!(ApiError::from(AuthError::MissingToken).status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ApiError::from(AuthError::Jwks("down".into())).status(), StatusCode::UNAUTHORIZED);
    let limited = RateLimitError::Exceeded { class: crate::rate_limit::RateClass::Read, limit: 1, window_secs: 60 };
    assert_eq!(ApiError::from(limited).status(), StatusCode::TOO_MANY_REQUESTS);
}

#[test]
fn malformed_id_uses_not_found_message() {
    let err = parse_id("abc", |raw| ApiError::product_not_found(raw)).unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert_eq!(err.to_string(), "Produto 'abc' não encontrado.");
}

#[tokio::test]
async fn body_carries_detail() {
    let err = ApiError::from(ValidationError {
        errors: vec![FieldError { field: Field::Price, message: "Preço deve ser maior que 0".into() }],
    });
    let (status, body) = body_json(err).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "Preço deve ser maior que 0");
}

#[tokio::test]
async fn internal_errors_hide_cause() {
    let (status, body) = body_json(ApiError::Internal("connection reset".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "internal server error");
}
