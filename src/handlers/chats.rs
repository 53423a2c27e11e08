//! Consultation chat handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::AppError;
use crate::extractors::Session;
use crate::response;
use crate::service::{ChatMode, ChatService};
use crate::state::AppState;

/// An empty `status` value filters nothing, same as leaving it off.
fn status_param(params: &HashMap<String, String>) -> Option<&str> {
    params
        .get("status")
        .map(String::as_str)
        .filter(|s| !s.is_empty())
}

/// GET /api/chats
pub async fn list_chats(
    session: Session,
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let status = status_param(&params);
    let chats = ChatService::list_for_user(&state.db, &session.email, status).await?;
    Ok(Json(response::documents_to_json(chats)))
}

/// POST /api/chats
pub async fn create_chat(
    session: Session,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let mode = body
        .get("mode")
        .and_then(Value::as_str)
        .and_then(ChatMode::parse)
        .ok_or_else(|| AppError::BadRequest("Invalid mode".into()))?;
    let chat = ChatService::create(&state.db, &session.email, mode).await?;
    Ok((
        StatusCode::CREATED,
        Json(response::document_to_json(chat)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_status_means_no_filter() {
        let mut params = HashMap::new();
        assert_eq!(status_param(&params), None);
        params.insert("status".to_string(), String::new());
        assert_eq!(status_param(&params), None);
        params.insert("status".to_string(), "open".to_string());
        assert_eq!(status_param(&params), Some("open"));
    }
}
