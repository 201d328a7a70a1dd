//! Client-side core for the cart apps: a typed REST client over the item
//! service and an in-memory cache that applies mutations optimistically,
//! reverting to the last-confirmed server state when a call fails.

pub mod api;
pub mod cache;
pub mod error;

pub use api::ItemsApi;
pub use cache::ItemCache;
pub use error::ClientError;
