//! Chat message handlers, including the token billing path.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use bson::oid::ObjectId;
use serde_json::Value;

use crate::error::AppError;
use crate::extractors::Session;
use crate::response;
use crate::service::{AuthorType, ChatService, MessageDraft};
use crate::state::AppState;

fn parse_chat_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::BadRequest("Invalid chatId".into()))
}

/// The author and content fields are mandatory; everything else is optional
/// and stored as submitted.
fn draft_from_body(body: &Value) -> Result<MessageDraft, AppError> {
    let author_type = body
        .get("authorType")
        .and_then(Value::as_str)
        .and_then(AuthorType::parse);
    let content = body.get("content").and_then(Value::as_str);
    let (author_type, content) = match (author_type, content) {
        (Some(author_type), Some(content)) => (author_type, content),
        _ => return Err(AppError::BadRequest("Invalid payload".into())),
    };
    Ok(MessageDraft {
        author_type,
        content: content.to_string(),
        is_paid: body.get("isPaid").and_then(Value::as_bool).unwrap_or(false),
        message_type: body
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// GET /api/chats/:chat_id/messages
pub async fn list_messages(
    _session: Session,
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let chat_id = parse_chat_id(&chat_id)?;
    let messages = ChatService::messages(&state.db, &chat_id).await?;
    Ok(Json(response::documents_to_json(messages)))
}

/// POST /api/chats/:chat_id/messages
pub async fn post_message(
    session: Session,
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let chat_id = parse_chat_id(&chat_id)?;
    let draft = draft_from_body(&body)?;
    let message = ChatService::post_message(&state.db, chat_id, &session.email, draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(response::document_to_json(message)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn draft_requires_author_and_string_content() {
        let ok = draft_from_body(&json!({
            "authorType": "specialist",
            "content": "hello",
            "isPaid": true,
            "type": "initial-vent",
        }))
        .unwrap();
        assert_eq!(ok.author_type, AuthorType::Specialist);
        assert!(ok.is_paid);
        assert_eq!(ok.message_type.as_deref(), Some("initial-vent"));

        for bad in [
            json!({"authorType": "bot", "content": "hi"}),
            json!({"authorType": "user", "content": 7}),
            json!({"content": "hi"}),
            json!({"authorType": "user"}),
        ] {
            assert!(matches!(
                draft_from_body(&bad),
                Err(AppError::BadRequest(msg)) if msg == "Invalid payload"
            ));
        }
    }

    #[test]
    fn draft_defaults_optional_fields() {
        let draft = draft_from_body(&json!({"authorType": "user", "content": "hi"})).unwrap();
        assert!(!draft.is_paid);
        assert!(draft.message_type.is_none());
    }
}
