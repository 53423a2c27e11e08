//! Chat, message, and token purchase routes.

use crate::handlers::chats::{create_chat, list_chats};
use crate::handlers::messages::{list_messages, post_message};
use crate::handlers::tokens::purchase_tokens;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn chat_routes(state: AppState) -> Router {
    Router::new()
        .route("/chats", get(list_chats).post(create_chat))
        .route(
            "/chats/:chat_id/messages",
            get(list_messages).post(post_message),
        )
        .route("/purchase-tokens", post(purchase_tokens))
        .with_state(state)
}
