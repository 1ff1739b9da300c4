// SPDX-License-Identifier: MIT

//! Authentication middleware tests for the protected route group.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

const USER_ID: &str = "f3b9c2d4-0000-4000-8000-0123456789ab";

#[tokio::test]
async fn test_user_delete_requires_token() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/users/{}", USER_ID))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_delete_rejects_garbage_token() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/users/{}", USER_ID))
                .header(header::AUTHORIZATION, "Bearer not.a.jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_delete_rejects_token_signed_with_wrong_key() {
    let (app, _state) = common::create_test_app();
    let token = common::create_test_jwt(USER_ID, b"some_other_key_32_bytes_minimum!");

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/users/{}", USER_ID))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_delete_with_valid_token_reaches_handler() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(USER_ID, &state.config.jwt_access_secret);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/users/{}", USER_ID))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Offline database: past the auth gate the handler fails on the
    // user lookup, which maps to 500 rather than 401.
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_feedback_list_requires_token() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/feedback")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_feedback_submission_is_public() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/feedback")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({ "feedback_text": "Bonjour" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    // No auth gate: the offline database failure (500) proves the
    // request reached the handler.
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_non_bearer_scheme_rejected() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/feedback")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
