//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOG_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `CATALOG_HOST` - Bind address (default: 127.0.0.1)
//! - `CATALOG_PORT` - Listen port (default: 8000)
//! - `ENVIRONMENT` - Deployment environment: local, staging, production (default: local)
//! - `CATALOG_REGION` - Region tag added to every metric (falls back to `AWS_REGION`, default: us-east-1)
//! - `CATALOG_REQUEST_TIMEOUT_SECS` - Per-request timeout, at least 1 (default: 30)
//! - `CATALOG_STATEMENT_TIMEOUT_SECS` - `PostgreSQL` `statement_timeout` (default: 5)
//! - `CATALOG_MAX_CONNECTIONS` - Connection pool size, at least 1 (default: 10)
//! - `CATALOG_AUTO_MIGRATE` - Run embedded migrations on startup (default: true)
//! - `CATALOG_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::num::{NonZeroU32, NonZeroU64};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Deployment environment, used to tag metrics and Sentry events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl Environment {
    /// Label value for metrics and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "dev" | "development" => Ok(Self::Local),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!(
                "unknown environment '{other}' (expected local, staging or production)"
            )),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected pretty or json)")),
        }
    }
}

/// Catalog service configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Deployment environment tag
    pub environment: Environment,
    /// Region tag for metrics
    pub region: String,
    /// Upper bound on the time spent handling a single request
    pub request_timeout: Duration,
    /// Upper bound on a single SQL statement
    pub statement_timeout: Duration,
    /// Maximum pooled database connections
    pub max_connections: u32,
    /// Run embedded migrations before serving
    pub auto_migrate: bool,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("CATALOG_DATABASE_URL")?;
        let host = parse_env("CATALOG_HOST", "127.0.0.1")?;
        let port = parse_env("CATALOG_PORT", "8000")?;
        let environment = parse_env("ENVIRONMENT", "local")?;
        let region = get_optional_env("CATALOG_REGION")
            .or_else(|| get_optional_env("AWS_REGION"))
            .unwrap_or_else(|| "us-east-1".to_string());
        let request_timeout = Duration::from_secs(
            parse_env::<NonZeroU64>("CATALOG_REQUEST_TIMEOUT_SECS", "30")?.get(),
        );
        let statement_timeout =
            Duration::from_secs(parse_env("CATALOG_STATEMENT_TIMEOUT_SECS", "5")?);
        let max_connections = parse_env::<NonZeroU32>("CATALOG_MAX_CONNECTIONS", "10")?.get();
        let auto_migrate = parse_env("CATALOG_AUTO_MIGRATE", "true")?;
        let log_format = parse_env("CATALOG_LOG_FORMAT", "pretty")?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            environment,
            region,
            request_timeout,
            statement_timeout,
            max_connections,
            auto_migrate,
            log_format,
            sentry_dsn,
        })
    }

    /// Configuration for running against a local database; everything else
    /// takes its default.
    #[must_use]
    pub fn local(database_url: impl Into<String>) -> Self {
        Self {
            database_url: SecretString::from(database_url.into()),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8000,
            environment: Environment::Local,
            region: "us-east-1".to_string(),
            request_timeout: Duration::from_secs(30),
            statement_timeout: Duration::from_secs(5),
            max_connections: 10,
            auto_migrate: true,
            log_format: LogFormat::Pretty,
            sentry_dsn: None,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!("local".parse::<Environment>().unwrap(), Environment::Local);
        assert_eq!(
            "PRODUCTION".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert!("moon".parse::<Environment>().is_err());
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_parse_value_reports_key() {
        let err = parse_value::<u16>("CATALOG_PORT", "eighty").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CATALOG_PORT"));
        assert!(parse_value::<bool>("CATALOG_AUTO_MIGRATE", "maybe").is_err());
        assert!(parse_value::<bool>("CATALOG_AUTO_MIGRATE", " false ").is_ok());
    }

    #[test]
    fn test_zero_pool_size_and_timeout_are_rejected() {
        let err = parse_value::<NonZeroU32>("CATALOG_MAX_CONNECTIONS", "0").unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CATALOG_MAX_CONNECTIONS")
        );
        let err = parse_value::<NonZeroU64>("CATALOG_REQUEST_TIMEOUT_SECS", "0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(..)));
        assert_eq!(
            parse_value::<NonZeroU32>("CATALOG_MAX_CONNECTIONS", "4")
                .unwrap()
                .get(),
            4
        );
    }

    #[test]
    fn test_local_defaults() {
        let config = CatalogConfig::local("postgres://localhost/catalogos");
        assert_eq!(config.environment, Environment::Local);
        assert_eq!(
            config.database_url.expose_secret(),
            "postgres://localhost/catalogos"
        );
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn test_debug_does_not_leak_database_url() {
        let config = CatalogConfig::local("postgres://user:hunter2@db/catalogos");
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("hunter2"));
    }
}
