//! API server configuration.
//!
//! Loaded from environment variables (after an optional `.env` file) with
//! fallback to defaults.
//!
//! | Variable                  | Default     |
//! |---------------------------|-------------|
//! | `DB_TYPE`                 | (required)  |
//! | `DB_HOST`                 | `localhost` |
//! | `DB_PORT`                 | engine port |
//! | `DB_USER` / `DB_PASS`     | empty       |
//! | `DB_NAME`                 | (required)  |
//! | `DB_MAX_CONNECTIONS`      | `10`        |
//! | `DB_ACQUIRE_TIMEOUT_SECS` | `5`         |
//! | `APP_ADDRESS`             | `:3300`     |
//! | `REQUEST_TIMEOUT_SECS`    | `30`        |

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use storefront_db::{DbConfig, Engine};

pub const DEFAULT_ADDRESS: &str = ":3300";

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database: DbConfig,

    /// `host:port` to bind; a bare `:port` binds every interface.
    pub address: String,

    /// Requests running longer than this are aborted.
    pub request_timeout: Duration,
}

/// The environment as the `config` crate sees it (keys lowercased).
#[derive(Debug, Deserialize)]
struct RawSettings {
    db_type: Option<String>,
    db_host: String,
    db_port: Option<u16>,
    #[serde(default)]
    db_user: String,
    #[serde(default)]
    db_pass: String,
    db_name: Option<String>,
    db_max_connections: u32,
    db_acquire_timeout_secs: u64,
    app_address: String,
    request_timeout_secs: u64,
}

impl Settings {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Settings::from_source(config::Environment::default())
    }

    /// Load configuration from explicit key/value pairs (tests, tooling).
    pub fn from_map(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Settings::from_source(config::Environment::default().source(Some(vars)))
    }

    fn from_source(env: config::Environment) -> Result<Self, ConfigError> {
        let raw: RawSettings = config::Config::builder()
            .set_default("db_host", "localhost")?
            .set_default("db_max_connections", 10)?
            .set_default("db_acquire_timeout_secs", 5)?
            .set_default("app_address", DEFAULT_ADDRESS)?
            .set_default("request_timeout_secs", 30)?
            .add_source(env)
            .build()?
            .try_deserialize()?;

        let engine: Engine = raw
            .db_type
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingRequired("DB_TYPE".to_string()))?
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DB_TYPE".to_string()))?;

        let db_name = raw
            .db_name
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingRequired("DB_NAME".to_string()))?;

        if raw.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }
        if raw.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("REQUEST_TIMEOUT_SECS".to_string()));
        }

        let mut database = DbConfig::new(engine)
            .host(raw.db_host)
            .credentials(raw.db_user, raw.db_pass)
            .database(db_name)
            .max_connections(raw.db_max_connections)
            .acquire_timeout(Duration::from_secs(raw.db_acquire_timeout_secs));
        if let Some(port) = raw.db_port {
            database = database.with_port(port);
        }

        Ok(Settings {
            database,
            address: normalize_address(&raw.app_address),
            request_timeout: Duration::from_secs(raw.request_timeout_secs),
        })
    }
}

fn normalize_address(address: &str) -> String {
    let address = address.trim();
    if address.is_empty() {
        normalize_address(DEFAULT_ADDRESS)
    } else if address.starts_with(':') {
        format!("0.0.0.0{}", address)
    } else {
        address.to_string()
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_map(vars(&[("DB_TYPE", "postgres"), ("DB_NAME", "shop")]))
            .unwrap();

        assert_eq!(settings.address, "0.0.0.0:3300");
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.database.engine, Engine::Postgres);
        assert_eq!(settings.database.host, "localhost");
        assert_eq!(settings.database.port(), 5432);
        assert_eq!(settings.database.max_connections, 10);
    }

    #[test]
    fn test_explicit_values() {
        let settings = Settings::from_map(vars(&[
            ("DB_TYPE", "mysql"),
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "3307"),
            ("DB_USER", "shop"),
            ("DB_PASS", "1234"),
            ("DB_NAME", "storefront"),
            ("APP_ADDRESS", "127.0.0.1:8080"),
            ("REQUEST_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(settings.database.engine, Engine::MySql);
        assert_eq!(settings.database.host, "db.internal");
        assert_eq!(settings.database.port(), 3307);
        assert_eq!(settings.database.username, "shop");
        assert_eq!(settings.database.password, "1234");
        assert_eq!(settings.address, "127.0.0.1:8080");
        assert_eq!(settings.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_engine_is_required_and_checked() {
        let missing = Settings::from_map(vars(&[("DB_NAME", "shop")])).unwrap_err();
        assert!(matches!(missing, ConfigError::MissingRequired(ref key) if key == "DB_TYPE"));

        let unsupported =
            Settings::from_map(vars(&[("DB_TYPE", "oracle"), ("DB_NAME", "shop")])).unwrap_err();
        assert!(matches!(unsupported, ConfigError::InvalidValue(ref key) if key == "DB_TYPE"));
    }

    #[test]
    fn test_numeric_looking_strings_are_kept_verbatim() {
        let settings = Settings::from_map(vars(&[
            ("DB_TYPE", "postgres"),
            ("DB_NAME", "0042"),
            ("DB_USER", "1.50"),
            ("DB_PASS", "007"),
            ("DB_PORT", "6543"),
            ("DB_MAX_CONNECTIONS", "4"),
        ]))
        .unwrap();

        assert_eq!(settings.database.database, "0042");
        assert_eq!(settings.database.username, "1.50");
        assert_eq!(settings.database.password, "007");
        assert_eq!(settings.database.port(), 6543);
        assert_eq!(settings.database.max_connections, 4);
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address(":3300"), "0.0.0.0:3300");
        assert_eq!(normalize_address(""), "0.0.0.0:3300");
        assert_eq!(normalize_address("localhost:9000"), "localhost:9000");
    }
}
