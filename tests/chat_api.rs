//! Status-code and body contract for the chat and token routes.

mod common;

use axum::http::{Method, StatusCode};
use common::{anonymous, as_role, as_role_json, body_json};
use serde_json::json;
use tower::ServiceExt;

const HEX_ID: &str = "507f1f77bcf86cd799439011";

#[tokio::test]
async fn chats_require_identity() {
    let app = common::app(&[]).await;
    let response = app
        .oneshot(anonymous(Method::GET, "/api/chats"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({"error": "Unauthorized"}));
}

#[tokio::test]
async fn chat_mode_is_validated() {
    let app = common::app(&[]).await;
    for body in [json!({"mode": "banter"}), json!({"mode": 2}), json!({})] {
        let response = app
            .clone()
            .oneshot(as_role_json(Method::POST, "/api/chats", "user", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Invalid mode"}));
    }
}

#[tokio::test]
async fn malformed_chat_id_is_rejected() {
    let app = common::app(&[]).await;
    let response = app
        .oneshot(as_role(Method::GET, "/api/chats/banana/messages", "user"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "Invalid chatId"}));
}

#[tokio::test]
async fn message_payload_is_validated_before_billing() {
    let app = common::app(&[]).await;
    let uri = format!("/api/chats/{HEX_ID}/messages");
    for body in [
        json!({"authorType": "bot", "content": "hi"}),
        json!({"authorType": "user", "content": 42}),
        json!({"content": "hi"}),
    ] {
        let response = app
            .clone()
            .oneshot(as_role_json(Method::POST, &uri, "user", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Invalid payload"}));
    }
}

#[tokio::test]
async fn purchase_amount_must_be_positive() {
    let app = common::app(&[]).await;
    for body in [
        json!({"amount": -5}),
        json!({"amount": 0}),
        json!({"amount": "12"}),
        json!({}),
    ] {
        let response = app
            .clone()
            .oneshot(as_role_json(Method::POST, "/api/purchase-tokens", "user", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Invalid amount"}));
    }
}

#[tokio::test]
async fn health_and_version_respond() {
    let app = common::app(&[]).await;
    let health = app
        .clone()
        .oneshot(anonymous(Method::GET, "/health"))
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(body_json(health).await, json!({"status": "ok"}));

    let version = app
        .oneshot(anonymous(Method::GET, "/version"))
        .await
        .unwrap();
    assert_eq!(version.status(), StatusCode::OK);
    let body = body_json(version).await;
    assert_eq!(body["name"], "confide-backend");
}
