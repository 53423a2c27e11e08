//! Admin resource browser handlers: list, read, patch, delete.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use bson::oid::ObjectId;
use serde_json::Value;
use std::collections::HashMap;

use crate::coerce::coerce_update;
use crate::error::AppError;
use crate::extractors::Session;
use crate::query::ListQuery;
use crate::response::{self, Page};
use crate::service::AdminStore;
use crate::state::AppState;

fn parse_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::BadRequest("Invalid id".into()))
}

fn body_to_map(value: Value) -> Result<serde_json::Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// GET /api/admin/resources/_meta
pub async fn meta(
    session: Session,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    session.require_admin()?;
    let tables = state.catalog.names()?;
    Ok(Json(serde_json::json!({ "tables": tables })))
}

/// GET /api/admin/resources/:resource
pub async fn list(
    session: Session,
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    session.require_admin()?;
    let collection = state.catalog.authorize(&resource)?;
    let query = ListQuery::from_params(&params);
    let (data, total) = AdminStore::list(&state.db, collection, &query).await?;
    Ok(Json(Page {
        data: response::documents_to_json(data),
        page: query.page,
        limit: query.limit,
        total,
    }))
}

/// GET /api/admin/resources/:resource/:id
pub async fn read(
    session: Session,
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    session.require_admin()?;
    let collection = state.catalog.authorize(&resource)?;
    let id = parse_id(&id)?;
    let doc = AdminStore::find_by_id(&state.db, collection, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".into()))?;
    Ok(Json(response::document_to_json(doc)))
}

/// PATCH /api/admin/resources/:resource/:id
///
/// Every field is validated against the current document before a single
/// `$set` writes them all. The document can vanish between the fetch and the
/// update; that surfaces as 404 rather than an upsert.
pub async fn patch(
    session: Session,
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    session.require_admin()?;
    let collection = state.catalog.authorize(&resource)?;
    let id = parse_id(&id)?;
    let updates = body_to_map(body)?;
    let current = AdminStore::find_by_id(&state.db, collection, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".into()))?;
    let validated = coerce_update(&current, &updates)?;
    // An empty $set is a store error; with nothing to write the fetch above
    // already proved the document exists.
    if !validated.is_empty() {
        let matched = AdminStore::update_by_id(&state.db, collection, &id, validated).await?;
        if !matched {
            return Err(AppError::NotFound("Not found".into()));
        }
    }
    Ok(Json(response::success()))
}

/// DELETE /api/admin/resources/:resource/:id
pub async fn delete(
    session: Session,
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    session.require_admin()?;
    let collection = state.catalog.authorize(&resource)?;
    let id = parse_id(&id)?;
    let deleted = AdminStore::delete_by_id(&state.db, collection, &id).await?;
    if !deleted {
        return Err(AppError::NotFound("Not found".into()));
    }
    Ok(Json(response::success()))
}
