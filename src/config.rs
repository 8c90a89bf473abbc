use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub instance_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Key required in `x-api-key` for administrative requests. When unset,
    /// administrative requests are always rejected.
    pub admin_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("API_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .context("API_PORT must be a valid port number")?,
                // Used only for debugging/observability. If unset, fall back to HOSTNAME if
                // present (e.g. Docker/Kubernetes), otherwise "unknown".
                instance_id: env::var("INSTANCE_ID")
                    .or_else(|_| env::var("HOSTNAME"))
                    .unwrap_or_else(|_| "unknown".to_string()),
            },
            auth: AuthConfig {
                admin_api_key: env::var("ADMIN_API_KEY")
                    .ok()
                    .filter(|key| !key.is_empty()),
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
