//! Token purchase handler.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::error::AppError;
use crate::extractors::Session;
use crate::response;
use crate::service::TokenService;
use crate::state::AppState;

/// POST /api/purchase-tokens
pub async fn purchase_tokens(
    session: Session,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let amount = body
        .get("amount")
        .and_then(Value::as_f64)
        .filter(|a| *a > 0.0)
        .ok_or_else(|| AppError::BadRequest("Invalid amount".into()))?;
    let balance = TokenService::purchase(&state.db, &session.email, amount).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "tokens": response::bson_to_json(balance),
    })))
}
