// SPDX-License-Identifier: MIT

//! API input validation tests.
//!
//! These run against an offline app: validation rejects the request
//! before any database call happens, so a 400 response proves the
//! schema check fired first.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_encounter_rejects_malformed_user_id() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/userwords/encounter",
            serde_json::json!({ "user_id": "not-a-uuid", "word_id": "bonjour" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_failed");
    assert!(body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["field"] == "user_id"));
}

#[tokio::test]
async fn test_encounter_rejects_empty_word_id() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/userwords/encounter",
            serde_json::json!({
                "user_id": "f3b9c2d4-0000-4000-8000-0123456789ab",
                "word_id": ""
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_all_violations_reported_in_one_response() {
    let (app, _state) = common::create_test_app();

    // Both fields invalid: both must appear in the error list.
    let response = app
        .oneshot(json_request(
            "POST",
            "/userwords/check",
            serde_json::json!({ "user_id": "nope", "word_id": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
}

#[tokio::test]
async fn test_create_word_requires_meanings() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/words",
            serde_json::json!({ "word": "bonjour", "meanings": [] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["field"] == "meanings"));
}

#[tokio::test]
async fn test_create_word_rejects_empty_definition() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/words",
            serde_json::json!({
                "word": "bonjour",
                "meanings": [{ "definition": "" }]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["field"] == "meanings[0].definition"));
}

#[tokio::test]
async fn test_register_rejects_bad_email_and_short_password() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/register",
            serde_json::json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "not-an-email",
                "password": "abc",
                "proficiency_level": "Beginner",
                "learning_language": "French"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let errors = body["errors"].as_array().unwrap();
    assert!(errors.iter().any(|e| e["field"] == "email"));
    assert!(errors.iter().any(|e| e["field"] == "password"));
}

#[tokio::test]
async fn test_register_rejects_unknown_proficiency_level() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/register",
            serde_json::json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
                "password": "hunter22",
                "proficiency_level": "Expert",
                "learning_language": "French"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["field"] == "proficiency_level"));
}

#[tokio::test]
async fn test_article_metadata_rejects_bad_enums() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/articles/metadata",
            serde_json::json!({
                "title": "Une histoire",
                "difficulty_level": "Impossible",
                "article_type": "blog",
                "uploaded_by": "curator"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let errors = body["errors"].as_array().unwrap();
    assert!(errors.iter().any(|e| e["field"] == "difficulty_level"));
    assert!(errors.iter().any(|e| e["field"] == "article_type"));
}

#[tokio::test]
async fn test_custom_article_requires_user_id() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/articles/metadata",
            serde_json::json!({
                "title": "Mon article",
                "difficulty_level": "Beginner",
                "article_type": "custom",
                "uploaded_by": "f3b9c2d4-0000-4000-8000-0123456789ab"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["field"] == "user_id"));
}

#[tokio::test]
async fn test_feedback_rejects_out_of_range_rating() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/feedback",
            serde_json::json!({ "feedback_text": "Great app", "rating": 9 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["field"] == "rating"));
}

#[tokio::test]
async fn test_feedback_requires_text() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/feedback",
            serde_json::json!({ "feedback_text": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_progress_rejects_malformed_user_id() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/progress/not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_lookup_query_accepts_camel_case_user_id() {
    let (app, _state) = common::create_test_app();

    // The alias is recognized: a malformed value under the camelCase
    // spelling still hits UUID validation rather than being ignored.
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/words/getWord/chat?userId=not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["field"] == "user_id"));
}

#[tokio::test]
async fn test_article_list_accepts_camel_case_difficulty() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/articles?difficultyLevel=Impossible")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_interaction_update_malformed_id_is_not_found() {
    let (app, _state) = common::create_test_app();

    // An ID that cannot be a composite pair ID names no record; with
    // the offline database this proves the shape check fires before
    // any store call.
    let response = app
        .oneshot(json_request(
            "PATCH",
            "/userwords/not-a-composite",
            serde_json::json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_interaction_delete_malformed_id_is_not_found() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/userwords/garbage")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_interaction_patch_rejects_unknown_fields() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "PATCH",
            "/userwords/some-record-id",
            serde_json::json!({ "encounteredCount": 5 }),
        ))
        .await
        .unwrap();

    // deny_unknown_fields makes axum's Json extractor reject the body.
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
