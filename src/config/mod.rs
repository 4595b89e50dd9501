//! Configuration module for the Recipe Box backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key the account gateway presents (required in production)
    pub api_psk: Option<String>,
    /// Path to the SQLite file backing the document and blob stores
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Base URL under which uploaded images are publicly reachable
    pub public_base_url: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let api_psk = env::var("RECIPES_API_PSK").ok().filter(|k| !k.is_empty());

        let db_path = env::var("RECIPES_DB_PATH")
            .unwrap_or_else(|_| "./data/recipes.sqlite".to_string())
            .into();

        let bind_addr: SocketAddr = env::var("RECIPES_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| format!("Invalid RECIPES_BIND_ADDR format: {}", e))?;

        let public_base_url = env::var("RECIPES_PUBLIC_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| format!("http://{}", bind_addr));

        let log_level = env::var("RECIPES_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            api_psk,
            db_path,
            bind_addr,
            public_base_url,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("RECIPES_API_PSK");
        env::remove_var("RECIPES_DB_PATH");
        env::remove_var("RECIPES_BIND_ADDR");
        env::remove_var("RECIPES_PUBLIC_BASE_URL");
        env::remove_var("RECIPES_LOG_LEVEL");

        let config = Config::from_env().unwrap();

        assert!(config.api_psk.is_none());
        assert_eq!(config.db_path, PathBuf::from("./data/recipes.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.public_base_url, "http://127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
    }
}
