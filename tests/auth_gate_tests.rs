mod common;

use axum::{
    extract::FromRequestParts,
    http::{Method, Request, StatusCode, Uri, header, request::Parts},
};
use common::{InMemoryRepository, TEST_JWT_SECRET, test_state};
use job_portal::{auth::AuthUser, token};
use std::sync::Arc;

/// Helper to get the mutable Parts struct from a generated Request.
fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn parts_with_cookie(cookie: &str) -> Parts {
    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::COOKIE,
        header::HeaderValue::from_str(cookie).unwrap(),
    );
    parts
}

#[tokio::test]
async fn no_cookie_is_rejected_with_401() {
    let state = test_state(Arc::new(InMemoryRepository::default()));
    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());

    let result = AuthUser::from_request_parts(&mut parts, &state).await;
    assert_eq!(result.unwrap_err().status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unrelated_cookies_without_token_are_rejected_with_401() {
    let state = test_state(Arc::new(InMemoryRepository::default()));
    let mut parts = parts_with_cookie("theme=dark; session_hint=1");

    let result = AuthUser::from_request_parts(&mut parts, &state).await;
    assert_eq!(result.unwrap_err().status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn tampered_token_is_rejected_with_403() {
    let state = test_state(Arc::new(InMemoryRepository::default()));
    let token = token::issue(TEST_JWT_SECRET, "a@x.com").unwrap();
    let mut parts = parts_with_cookie(&format!("token={}x", token));

    let result = AuthUser::from_request_parts(&mut parts, &state).await;
    assert_eq!(result.unwrap_err().status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected_with_403() {
    let state = test_state(Arc::new(InMemoryRepository::default()));
    let token = token::issue("another-secret-altogether", "a@x.com").unwrap();
    let mut parts = parts_with_cookie(&format!("token={}", token));

    let result = AuthUser::from_request_parts(&mut parts, &state).await;
    assert_eq!(result.unwrap_err().status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn valid_token_attaches_the_token_email() {
    let state = test_state(Arc::new(InMemoryRepository::default()));
    let token = token::issue(TEST_JWT_SECRET, "a@x.com").unwrap();
    // The token cookie is picked out from surrounding cookies.
    let mut parts = parts_with_cookie(&format!("theme=dark; token={}", token));

    let auth = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap();
    assert_eq!(auth.email, "a@x.com");
}

#[tokio::test]
async fn admin_check_uses_the_verified_identity() {
    let state = test_state(Arc::new(InMemoryRepository::default()));

    let admin = AuthUser {
        email: state.config.admin_email.clone(),
    };
    assert!(admin.is_admin(&state.config));
    assert!(admin.require_admin(&state.config).is_ok());

    let visitor = AuthUser {
        email: "visitor@x.com".to_string(),
    };
    assert!(!visitor.is_admin(&state.config));
    assert_eq!(
        visitor.require_admin(&state.config).unwrap_err().status(),
        StatusCode::FORBIDDEN
    );
}
