//! Status-code and body contract for the admin resource browser.

mod common;

use axum::http::{Method, StatusCode};
use common::{anonymous, as_role, as_role_json, body_json};
use serde_json::json;
use tower::ServiceExt;

const HEX_ID: &str = "507f1f77bcf86cd799439011";

#[tokio::test]
async fn meta_lists_collections_in_configured_order() {
    let app = common::app(&["users", "chats", "messages"]).await;
    let response = app
        .oneshot(as_role(Method::GET, "/api/admin/resources/_meta", "admin"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"tables": ["users", "chats", "messages"]})
    );
}

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let app = common::app(&["users"]).await;
    let response = app
        .oneshot(anonymous(Method::GET, "/api/admin/resources/_meta"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({"error": "Unauthorized"}));
}

#[tokio::test]
async fn non_admin_roles_are_denied() {
    let app = common::app(&["users"]).await;
    for role in ["user", "specialist", "moderator"] {
        let response = app
            .clone()
            .oneshot(as_role(Method::GET, "/api/admin/resources/users", role))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await, json!({"error": "Access denied"}));
    }
}

#[tokio::test]
async fn empty_allow_list_is_a_server_error() {
    let app = common::app(&[]).await;
    let response = app
        .oneshot(as_role(Method::GET, "/api/admin/resources/_meta", "admin"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": "No allowed collections configured"})
    );
}

#[tokio::test]
async fn unlisted_resource_is_rejected() {
    let app = common::app(&["users"]).await;
    let response = app
        .oneshot(as_role(Method::GET, "/api/admin/resources/secrets", "admin"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "Invalid resource"}));
}

#[tokio::test]
async fn authorization_runs_before_id_validation() {
    // A bogus resource fails on the allow-list even when the id is fine.
    let app = common::app(&["users"]).await;
    let uri = format!("/api/admin/resources/secrets/{HEX_ID}");
    let response = app
        .oneshot(as_role(Method::GET, &uri, "admin"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "Invalid resource"}));
}

#[tokio::test]
async fn malformed_ids_are_rejected_per_method() {
    let app = common::app(&["users"]).await;
    for method in [Method::GET, Method::DELETE] {
        let response = app
            .clone()
            .oneshot(as_role(method, "/api/admin/resources/users/not-hex", "admin"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Invalid id"}));
    }
    let response = app
        .oneshot(as_role_json(
            Method::PATCH,
            "/api/admin/resources/users/not-hex",
            "admin",
            json!({"name": "x"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "Invalid id"}));
}

#[tokio::test]
async fn patch_body_must_be_an_object() {
    let app = common::app(&["users"]).await;
    let uri = format!("/api/admin/resources/users/{HEX_ID}");
    let response = app
        .oneshot(as_role_json(Method::PATCH, &uri, "admin", json!([1, 2])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"error": "body must be a JSON object"})
    );
}
