//! Cart Server - Grocery List API
//!
//! Thin REST surface over the item store: list, create, partial update,
//! delete, plus a status probe.

pub mod config;
pub mod http;

use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use cart_store::GroceryStore;

/// Shared application state
pub struct AppState {
    pub store: Box<dyn GroceryStore>,
}

impl AppState {
    pub fn new(store: Box<dyn GroceryStore>) -> Self {
        Self { store }
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Item endpoints
        .route("/items", get(http::list_items))
        .route("/items", post(http::create_item))
        .route("/items/{id}", patch(http::update_item))
        .route("/items/{id}", delete(http::delete_item))
        // System endpoints
        .route("/status", get(http::get_status))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the server
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Cart server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
