//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use cart_domain::{validate_transition, Item, ItemPatch, NewItem};
use cart_store::StoreError;

use crate::AppState;

/// Response for the item listing
#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<Item>,
}

/// Envelope for a single item
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub item: Item,
}

/// Response for a successful delete
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Error envelope
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response for the status probe
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub items: usize,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound(id) => {
            api_error(StatusCode::NOT_FOUND, format!("Item not found: {}", id))
        }
        StoreError::Storage(msg) => {
            tracing::error!("store failure: {}", msg);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to reach store")
        }
    }
}

fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| api_error(StatusCode::NOT_FOUND, format!("Item not found: {}", id)))
}

/// GET /items: all items, newest creation first
pub async fn list_items(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ItemsResponse>, ApiError> {
    let items = state.store.list().map_err(store_error)?;
    Ok(Json(ItemsResponse { items }))
}

/// POST /items: create an item
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewItem>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let item = state.store.insert(new).map_err(store_error)?;
    tracing::debug!("created item {}", item.id);
    Ok((StatusCode::CREATED, Json(ItemResponse { item })))
}

/// PATCH /items/{id}: partial update
///
/// A patch that sets `status` is validated against the lifecycle before
/// persisting; invalid transitions are rejected with 422.
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<ItemPatch>,
) -> Result<Json<ItemResponse>, ApiError> {
    let id = parse_id(&id)?;

    if let Some(to) = patch.status {
        let current = state
            .store
            .get(id)
            .map_err(store_error)?
            .ok_or_else(|| store_error(StoreError::NotFound(id)))?;
        validate_transition(current.status, to)
            .map_err(|e| api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    }

    let item = state.store.update(id, &patch).map_err(store_error)?;
    Ok(Json(ItemResponse { item }))
}

/// DELETE /items/{id}
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_id(&id)?;
    state.store.delete(id).map_err(store_error)?;
    Ok(Json(DeleteResponse { success: true }))
}

/// GET /status: liveness probe with the stored item count
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let items = state.store.count().map_err(store_error)?;
    Ok(Json(StatusResponse {
        status: "ok".to_string(),
        items,
    }))
}
