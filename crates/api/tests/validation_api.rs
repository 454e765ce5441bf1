//! Request validation on the submission endpoint. Runs without PostgreSQL:
//! malformed input is rejected before a transaction is opened.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, get, offline_app, post_json, send, token_for};
use lexi_core::roles::ROLE_USER;
use serde_json::json;

fn learner() -> String {
    token_for(5, ROLE_USER)
}

#[tokio::test]
async fn non_numeric_task_id_is_400() {
    let token = learner();
    let response = post_json(
        offline_app(),
        "/api/tasks/abc/submit",
        Some(&token),
        json!({ "answerWords": ["hola"] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["message"], "Invalid task id");
}

#[tokio::test]
async fn empty_answer_is_400() {
    let token = learner();
    let response = post_json(
        offline_app(),
        "/api/tasks/3/submit",
        Some(&token),
        json!({ "answerWords": [] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "answerWords must be a non-empty array");
}

#[tokio::test]
async fn missing_or_non_array_answer_is_400() {
    for (body, message) in [
        (json!({}), "answerWords must be a non-empty array"),
        (
            json!({ "answerWords": "hola mundo" }),
            "Request body has missing or invalid fields",
        ),
    ] {
        let token = learner();
        let response = post_json(offline_app(), "/api/tasks/3/submit", Some(&token), body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], message);
    }
}

#[tokio::test]
async fn non_string_words_pass_validation() {
    // Mixed scalars are accepted and reach grading, which needs the database.
    let token = learner();
    let response = post_json(
        offline_app(),
        "/api/tasks/3/submit",
        Some(&token),
        json!({ "answerWords": ["I", 2, "cats"] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Server error");
}

#[tokio::test]
async fn task_id_is_checked_before_the_body() {
    let token = learner();
    let response = send(
        offline_app(),
        Method::POST,
        "/api/tasks/abc/submit",
        Some(&token),
        Some(String::new()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Invalid task id");
}

#[tokio::test]
async fn malformed_json_is_400() {
    let token = learner();
    let response = send(
        offline_app(),
        Method::POST,
        "/api/tasks/3/submit",
        Some(&token),
        Some("{\"answerWords\": [".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["message"], "Request body is not valid JSON");
}

#[tokio::test]
async fn bad_lesson_ids_are_400() {
    let token = learner();
    for uri in ["/api/progress/lessons/x", "/api/lessons/0/tasks"] {
        let response = get(offline_app(), uri, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn database_outage_is_a_generic_500() {
    let token = learner();
    let response = post_json(
        offline_app(),
        "/api/tasks/3/submit",
        Some(&token),
        json!({ "answerWords": ["hola"] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Server error");
}
