use super::*;

use axum::http::{Request, StatusCode};

use crate::services::jwks::BYPASS_SUBJECT;
use crate::state::test_helpers::{test_app_state, test_app_state_verified, test_app_state_with_limits};

fn parts(authorization: Option<&str>) -> Parts {
    let mut builder = Request::builder().uri("/api/categories/");
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    builder.body(()).unwrap().into_parts().0
}

// =============================================================================
// bearer_token
// =============================================================================

#[test]
fn bearer_token_extracts_token() {
    assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
}

#[test]
fn bearer_scheme_is_case_insensitive() {
    assert_eq!(bearer_token("bearer abc"), Some("abc"));
    assert_eq!(bearer_token("BEARER  abc "), Some("abc"));
}

#[test]
fn other_schemes_are_ignored() {
    assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
}

#[test]
fn empty_token_is_ignored() {
    assert_eq!(bearer_token("Bearer "), None);
    assert_eq!(bearer_token("Bearer"), None);
}

// =============================================================================
// Extractor
// =============================================================================

#[tokio::test]
async fn missing_header_is_unauthorized() {
    let state = test_app_state_verified();
    let err = AuthUser::from_request_parts(&mut parts(None), &state).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_token_is_unauthorized() {
    let state = test_app_state_verified();
    let err = AuthUser::from_request_parts(&mut parts(Some("Bearer nope")), &state).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bypass_admits_requests_without_header() {
    let state = test_app_state();
    let user = AuthUser::from_request_parts(&mut parts(None), &state).await.unwrap();
    assert_eq!(user.identity.subject, BYPASS_SUBJECT);
}

// =============================================================================
// admit
// =============================================================================

#[tokio::test]
async fn admit_enforces_class_budget() {
    let state = test_app_state_with_limits(crate::rate_limit::RateLimitConfig {
        read_limit: 1,
        write_limit: 1,
        low_stock_limit: 1,
        user_admin_limit: 1,
        window: std::time::Duration::from_secs(60),
    });
    let user = AuthUser::from_request_parts(&mut parts(None), &state).await.unwrap();

    user.admit(&state, RateClass::Write).unwrap();
    let err = user.admit(&state, RateClass::Write).unwrap_err();
    assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(user.admit(&state, RateClass::Read).is_ok());
}
