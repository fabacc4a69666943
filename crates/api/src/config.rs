//! # API Configuration Module
//!
//! Loads the server configuration from environment variables, falling back to
//! defaults where a value is optional.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: host address to bind to (default: "0.0.0.0")
//! - `API_PORT`: port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default: 5)
//! - `LOG_LEVEL`: logging level (default: "info")
//! - `API_CORS_ORIGINS`: comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: per-request timeout (default: 30)
//! - `BUSINESS_OPEN_HOUR` / `BUSINESS_CLOSE_HOUR`: business day (default: 9 to 19)
//! - `BOOKING_MAX_WEEKS_AHEAD`: weeks after the current one open for booking (default: 3)

use eyre::{Result, WrapErr};
use salonbook_core::calendar::BookingPolicy;
use std::{env, str::FromStr};
use tracing::Level;

/// Configuration for the SalonBook API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use salonbook_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    pub database_max_connections: u32,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Business hours and booking horizon
    pub policy: BookingPolicy,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - A numeric variable is set but cannot be parsed
    /// - The business hours do not form a valid range
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Network settings
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "API_PORT", 3000)?;

        // Database settings
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| eyre::eyre!("DATABASE_URL environment variable must be set"))?;
        let database_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?;

        // Logging settings
        let log_level = match lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = lookup("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        let request_timeout = parse_or(&lookup, "API_REQUEST_TIMEOUT_SECONDS", 30)?;

        // Booking rules
        let defaults = BookingPolicy::default();
        let policy = BookingPolicy {
            open_hour: parse_or(&lookup, "BUSINESS_OPEN_HOUR", defaults.open_hour)?,
            close_hour: parse_or(&lookup, "BUSINESS_CLOSE_HOUR", defaults.close_hour)?,
            max_weeks_ahead: parse_or(&lookup, "BOOKING_MAX_WEEKS_AHEAD", defaults.max_weeks_ahead)?,
        };
        policy
            .validate()
            .wrap_err("Invalid booking policy configuration")?;

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            log_level,
            cors_origins,
            request_timeout,
            policy,
        })
    }

    /// Returns the server address as a string (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .wrap_err_with(|| format!("Invalid {} value: {:?}", key, raw)),
        None => Ok(default),
    }
}
