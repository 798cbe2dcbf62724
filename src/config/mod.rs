use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Error;

/// Environment variables that must be present (or supplied by a config file)
/// before the process is allowed to start.
pub const ENV_DB_URL: &str = "SENTINEL_DB_URL";
pub const ENV_JWT_SECRET: &str = "SENTINEL_JWT_SECRET";

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// API server address
    #[serde(default = "default_address")]
    pub address: String,
    /// API server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4850
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DatabaseConfig {
    /// Database URL (required; usually supplied via SENTINEL_DB_URL)
    #[serde(default)]
    pub url: String,
    /// Connection pool max size
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Automatic migration on startup
    #[serde(default)]
    pub auto_migrate: bool,
}

fn default_max_connections() -> u32 {
    5
}

/// Security configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SecurityConfig {
    /// Shared secret for validating bearer tokens issued by the identity
    /// provider (required; usually supplied via SENTINEL_JWT_SECRET)
    #[serde(default)]
    pub jwt_secret: String,
}

/// Bulk export configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Per-request timeout for fetching remote images, in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_fetch_timeout() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

/// Load configuration from a file or use defaults, then apply environment
/// overrides and validate the required connection settings.
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let mut config = match config_path {
        Some(path) => {
            let config_str = std::fs::read_to_string(path)
                .context(format!("Failed to read config file: {:?}", path))?;

            if path.extension().map_or(false, |ext| ext == "json") {
                serde_json::from_str(&config_str).context("Failed to parse JSON config")?
            } else if path.extension().map_or(false, |ext| ext == "toml") {
                toml::from_str(&config_str).context("Failed to parse TOML config")?
            } else {
                return Err(anyhow::anyhow!("Unsupported config file format"));
            }
        }
        None => Config::default(),
    };

    apply_env_overrides(&mut config);
    validate(&config)?;

    Ok(config)
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(url) = std::env::var(ENV_DB_URL) {
        config.database.url = url;
    }
    if let Ok(secret) = std::env::var(ENV_JWT_SECRET) {
        config.security.jwt_secret = secret;
    }
    if let Ok(port) = std::env::var("SENTINEL_API_PORT") {
        if let Ok(port) = port.parse() {
            config.api.port = port;
        }
    }
}

/// Fail fast at startup if the required connection configuration is absent.
fn validate(config: &Config) -> Result<()> {
    if config.database.url.is_empty() {
        return Err(Error::Config(format!(
            "database URL is not configured (set {} or database.url)",
            ENV_DB_URL
        ))
        .into());
    }
    if config.security.jwt_secret.is_empty() {
        return Err(Error::Config(format!(
            "JWT secret is not configured (set {} or security.jwt_secret)",
            ENV_JWT_SECRET
        ))
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_database_url_is_rejected() {
        let config = Config {
            security: SecurityConfig {
                jwt_secret: "secret".to_string(),
            },
            ..Config::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn missing_jwt_secret_is_rejected() {
        let config = Config {
            database: DatabaseConfig {
                url: "postgres://localhost/sentinel".to_string(),
                ..DatabaseConfig::default()
            },
            ..Config::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn complete_config_passes_validation() {
        let config = Config {
            database: DatabaseConfig {
                url: "postgres://localhost/sentinel".to_string(),
                ..DatabaseConfig::default()
            },
            security: SecurityConfig {
                jwt_secret: "secret".to_string(),
            },
            ..Config::default()
        };
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn toml_config_parses_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            [database]
            url = "postgres://localhost/sentinel"

            [security]
            jwt_secret = "secret"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.port, 4850);
        assert_eq!(config.database.max_connections, 5);
        assert!(!config.database.auto_migrate);
    }
}
