//! Configuration loading and repository construction.
//!
//! # Environment Variables
//!
//! Required:
//!
//! - `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`, `DB_PASSWORD`
//!
//! Optional:
//!
//! - `DB_MAX_CONNECTIONS`: pool size (default: `10`)
//! - `HOST`: listen address (default: `0.0.0.0`)
//! - `PORT`: listen port (default: `8080`)
//!
//! # Example
//!
//! ```ignore
//! let config = DatabaseConfig::from_env()?;
//! let repository = RepositoryFactory::new(config).create().await?;
//! ```

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use thiserror::Error;

use super::{PostgresTaskRepository, TaskRepository};

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while reading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A required variable is unset or blank.
    #[error("{0} environment variable is required")]
    MissingVariable(&'static str),

    /// A variable holds a value that does not parse as the expected number.
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber {
        /// Name of the offending variable.
        name: &'static str,
        /// The raw value.
        value: String,
    },

    /// `HOST` and `PORT` do not form a socket address.
    #[error("Invalid server address: {0}")]
    InvalidAddress(String),
}

/// Errors that can occur during repository initialization.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    DatabaseConnection(String),
}

// =============================================================================
// Variable Lookup Helpers
// =============================================================================

/// Reads a variable, treating empty or whitespace-only values as unset.
fn lookup_trimmed<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup_trimmed(lookup, name).ok_or(ConfigurationError::MissingVariable(name))
}

fn parse_number<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigurationError>
where
    T: std::str::FromStr + PartialOrd + Default,
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup_trimmed(lookup, name) else {
        return Ok(default);
    };

    match value.parse::<T>() {
        Ok(number) if number > T::default() => Ok(number),
        _ => Err(ConfigurationError::InvalidNumber { name, value }),
    }
}

fn process_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

// =============================================================================
// Database Configuration
// =============================================================================

/// Connection settings for the `PostgreSQL` store.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Database host name.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database name.
    pub name: String,
    /// Login role.
    pub user: String,
    /// Login password.
    pub password: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Creates a configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if a required variable is missing or a
    /// numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(process_env)
    }

    /// Creates a configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`DatabaseConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = required(&lookup, "DB_HOST")?;
        let raw_port = required(&lookup, "DB_PORT")?;
        let name = required(&lookup, "DB_NAME")?;
        let user = required(&lookup, "DB_USER")?;
        let password = required(&lookup, "DB_PASSWORD")?;

        let port = raw_port
            .parse::<u16>()
            .ok()
            .filter(|port| *port > 0)
            .ok_or(ConfigurationError::InvalidNumber {
                name: "DB_PORT",
                value: raw_port,
            })?;

        let max_connections = parse_number(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;

        Ok(Self {
            host,
            port,
            name,
            user,
            password,
            max_connections,
        })
    }

    /// Builds `sqlx` connection options. SSL is disabled.
    #[must_use]
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user)
            .password(&self.password)
            .ssl_mode(PgSslMode::Disable)
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Listen address of the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Creates a configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidNumber` if `PORT` does not parse.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(process_env)
    }

    /// Creates a configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup_trimmed(&lookup, "HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_number(&lookup, "PORT", DEFAULT_PORT)?;
        Ok(Self { host, port })
    }

    /// Resolves the socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidAddress` if `host:port` is not a
    /// valid socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigurationError> {
        let address = format!("{}:{}", self.host, self.port);
        address
            .parse()
            .map_err(|_| ConfigurationError::InvalidAddress(address))
    }
}

// =============================================================================
// Repository Factory
// =============================================================================

/// Opens a connection pool and verifies connectivity with a first connection.
///
/// # Errors
///
/// Returns `FactoryError::DatabaseConnection` if the store is unreachable or
/// rejects the credentials.
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, FactoryError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.connect_options())
        .await
        .map_err(|error| FactoryError::DatabaseConnection(error.to_string()))
}

/// Factory for the task repository used by the HTTP layer.
#[derive(Debug, Clone)]
pub struct RepositoryFactory {
    config: DatabaseConfig,
}

impl RepositoryFactory {
    /// Creates a new repository factory with the given configuration.
    #[must_use]
    pub const fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    /// Connects to the store and returns the `PostgreSQL` task repository.
    ///
    /// # Errors
    ///
    /// Returns `FactoryError::DatabaseConnection` if the connection fails.
    pub async fn create(&self) -> Result<Arc<dyn TaskRepository>, FactoryError> {
        let pool = connect_pool(&self.config).await?;
        Ok(Arc::new(PostgresTaskRepository::new(pool)))
    }
}

// =============================================================================
// Tests
// =============================================================================
