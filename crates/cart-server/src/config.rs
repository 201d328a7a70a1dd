//! Server configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the cart server binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "127.0.0.1:8080"
    pub addr: String,
    /// Database path. `None` runs on an in-memory store.
    pub db_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".to_string(),
            db_path: Some(PathBuf::from("cart.db")),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the environment.
    ///
    /// `CART_ADDR` overrides the bind address; `CART_DB` overrides the
    /// database path, with the literal value `:memory:` selecting the
    /// in-memory store.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let addr = std::env::var("CART_ADDR").unwrap_or(defaults.addr);
        let db_path = match std::env::var("CART_DB") {
            Ok(v) if v == ":memory:" => None,
            Ok(v) => Some(PathBuf::from(v)),
            Err(_) => defaults.db_path,
        };
        Self { addr, db_path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.addr, "127.0.0.1:8080");
        assert_eq!(config.db_path, Some(PathBuf::from("cart.db")));
    }
}
