//! Cart Server Binary
//!
//! Standalone REST server for the cart grocery list.

use std::sync::Arc;

use cart_server::{config::ServerConfig, serve, AppState};
use cart_store::SqliteGroceryStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env();
    let store = match &config.db_path {
        Some(path) => SqliteGroceryStore::open(path)?,
        None => SqliteGroceryStore::open_in_memory()?,
    };

    let state = Arc::new(AppState::new(Box::new(store)));
    serve(&config.addr, state).await
}
