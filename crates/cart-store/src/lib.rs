//! Persistence for the cart apps: the [`GroceryStore`] trait and its SQLite
//! implementation.

pub mod sqlite;
pub mod store;

pub use sqlite::SqliteGroceryStore;
pub use store::*;
