//! # API Configuration Module
//!
//! Loads the API server configuration from environment variables, falling
//! back to defaults where a value is optional.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `DEFAULT_WEEKS_AHEAD`: Horizon used when a request names none (default: 4)
//! - `MAX_WEEKS_AHEAD`: Largest horizon a request may ask for (default: 26)

use classrota_core::errors::{RotaError, RotaResult};
use eyre::{Result, WrapErr, eyre};
use std::env;
use tracing::Level;

/// Bounds on how far ahead sessions are generated or previewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    pub default_weeks: u32,
    pub max_weeks: u32,
}

impl Default for Horizon {
    fn default() -> Self {
        Self {
            default_weeks: 4,
            max_weeks: 26,
        }
    }
}

impl Horizon {
    /// Resolves the horizon of a request, `None` meaning the default.
    ///
    /// # Errors
    ///
    /// * `RotaError::Validation` - `requested` is 0 or above `max_weeks`
    pub fn weeks_ahead(&self, requested: Option<u32>) -> RotaResult<u32> {
        let weeks = requested.unwrap_or(self.default_weeks);
        if weeks == 0 || weeks > self.max_weeks {
            return Err(RotaError::Validation(format!(
                "weeks_ahead must be between 1 and {}, got {}",
                self.max_weeks, weeks
            )));
        }
        Ok(weeks)
    }
}

/// Configuration for the ClassRota API server
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    pub horizon: Horizon,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    /// - The weeks-ahead values are not positive integers, or the default
    ///   exceeds the maximum
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;

        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        let horizon = horizon_from(
            env::var("DEFAULT_WEEKS_AHEAD").ok().as_deref(),
            env::var("MAX_WEEKS_AHEAD").ok().as_deref(),
        )?;

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            horizon,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Unknown levels fall back to INFO.
pub fn parse_log_level(value: &str) -> Level {
    match value.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Builds the horizon from raw `DEFAULT_WEEKS_AHEAD` and `MAX_WEEKS_AHEAD` values.
pub fn horizon_from(default_weeks: Option<&str>, max_weeks: Option<&str>) -> Result<Horizon> {
    let fallback = Horizon::default();

    let default_weeks = match default_weeks {
        Some(value) => value
            .trim()
            .parse()
            .wrap_err("Invalid DEFAULT_WEEKS_AHEAD value")?,
        None => fallback.default_weeks,
    };
    let max_weeks = match max_weeks {
        Some(value) => value
            .trim()
            .parse()
            .wrap_err("Invalid MAX_WEEKS_AHEAD value")?,
        None => fallback.max_weeks,
    };

    if default_weeks == 0 || default_weeks > max_weeks {
        return Err(eyre!(
            "DEFAULT_WEEKS_AHEAD ({}) must be between 1 and MAX_WEEKS_AHEAD ({})",
            default_weeks,
            max_weeks
        ));
    }

    Ok(Horizon {
        default_weeks,
        max_weeks,
    })
}
