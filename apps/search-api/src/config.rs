//! Search API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults.

use std::env;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Search API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// Bind address (default: 0.0.0.0)
    pub bind_addr: String,

    /// Default number of products returned when the client sends no limit
    pub default_limit: usize,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            port: env::var("SEARCH_API_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SEARCH_API_PORT".to_string()))?,

            bind_addr: env::var("SEARCH_API_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string()),

            default_limit: env::var("SEARCH_DEFAULT_LIMIT")
                .unwrap_or_else(|_| "12".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SEARCH_DEFAULT_LIMIT".to_string()))?,
        };

        if config.default_limit == 0 {
            return Err(ConfigError::InvalidValue("SEARCH_DEFAULT_LIMIT".to_string()));
        }

        Ok(config)
    }

    /// Returns the full socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("SEARCH_API_BIND_ADDR".to_string()))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            port: 8080,
            bind_addr: "0.0.0.0".to_string(),
            default_limit: 12,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_socket_addr_parses() {
        let config = ApiConfig::default();
        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }
}
