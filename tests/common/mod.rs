//! Shared helpers for the API tests.
//!
//! The MongoDB client connects lazily, so a router built here never talks to
//! a server; the tests cover everything decided before the first store
//! round-trip (identity, authorization, resource and id validation, payload
//! validation).

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use confide_backend::{admin_routes, chat_routes, common_routes, AppState, ResourceCatalog};
use http_body_util::BodyExt;
use mongodb::Client;
use serde_json::Value;

pub async fn app(allowed: &[&str]) -> Router {
    let client = Client::with_uri_str("mongodb://localhost:27017")
        .await
        .expect("client construction needs no server");
    let state = AppState::new(
        client.database("confide-test"),
        ResourceCatalog::new(allowed.iter().map(|s| s.to_string()).collect()),
    );
    Router::new()
        .merge(common_routes())
        .nest("/api", chat_routes(state.clone()))
        .nest("/api/admin", admin_routes(state))
}

pub fn anonymous(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn as_role(method: Method, uri: &str, role: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-User-Email", "someone@example.com")
        .header("X-User-Role", role)
        .body(Body::empty())
        .unwrap()
}

pub fn as_role_json(method: Method, uri: &str, role: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-User-Email", "someone@example.com")
        .header("X-User-Role", role)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}
