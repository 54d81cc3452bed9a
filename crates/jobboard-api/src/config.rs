//! API configuration.

use std::str::FromStr;
use std::time::Duration;

use axum_extra::extract::cookie::SameSite;
use thiserror::Error;

use jobboard_firestore::{APPLICATIONS_COLLECTION, JOBS_COLLECTION};

/// Default session lifetime (5 hours).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 5 * 60 * 60;

/// Errors that prevent the server from starting.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Backing store for both collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Firestore,
    /// In-process store; data is lost on restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(Self::Firestore),
            "memory" => Ok(Self::Memory),
            _ => Err(()),
        }
    }
}

/// Session cookie attributes.
#[derive(Debug, Clone, Copy)]
pub struct CookieConfig {
    pub secure: bool,
    pub same_site: SameSite,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secure: false,
            same_site: SameSite::Lax,
        }
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Session signing secret
    pub jwt_secret: String,
    /// Session token lifetime
    pub session_ttl: Duration,
    pub cookie: CookieConfig,
    /// CORS origins (credentials are allowed for these)
    pub cors_origins: Vec<String>,
    /// Request timeout
    pub request_timeout: Duration,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    pub store_backend: StoreBackend,
    pub jobs_collection: String,
    pub applications_collection: String,
    /// Expose `/metrics`
    pub metrics_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            jwt_secret: String::new(),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            cookie: CookieConfig::default(),
            cors_origins: vec!["http://localhost:5173".to_string()],
            request_timeout: Duration::from_secs(30),
            max_body_size: 1024 * 1024,
            environment: "development".to_string(),
            store_backend: StoreBackend::Firestore,
            jobs_collection: JOBS_COLLECTION.to_string(),
            applications_collection: APPLICATIONS_COLLECTION.to_string(),
            metrics_enabled: true,
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let jwt_secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let port = match std::env::var("PORT") {
            Ok(_) => parse_env("PORT", defaults.port)?,
            Err(_) => parse_env("API_PORT", defaults.port)?,
        };

        Ok(Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port,
            jwt_secret,
            session_ttl: Duration::from_secs(parse_env("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?),
            cookie: CookieConfig {
                secure: parse_bool("COOKIE_SECURE", defaults.cookie.secure)?,
                same_site: parse_same_site(defaults.cookie.same_site)?,
            },
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            request_timeout: Duration::from_secs(parse_env("REQUEST_TIMEOUT", 30)?),
            max_body_size: parse_env("MAX_BODY_SIZE", defaults.max_body_size)?,
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            store_backend: match std::env::var("STORE_BACKEND") {
                Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
                    key: "STORE_BACKEND",
                    value,
                })?,
                Err(_) => defaults.store_backend,
            },
            jobs_collection: std::env::var("JOBS_COLLECTION").unwrap_or(defaults.jobs_collection),
            applications_collection: std::env::var("APPLICATIONS_COLLECTION")
                .unwrap_or(defaults.applications_collection),
            metrics_enabled: parse_bool("METRICS_ENABLED", defaults.metrics_enabled)?,
        })
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

fn parse_env<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

fn parse_bool(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(key) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value }),
        },
        Err(_) => Ok(default),
    }
}

fn parse_same_site(default: SameSite) -> Result<SameSite, ConfigError> {
    const KEY: &str = "COOKIE_SAME_SITE";
    match std::env::var(KEY) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(SameSite::Strict),
            "lax" => Ok(SameSite::Lax),
            "none" => Ok(SameSite::None),
            _ => Err(ConfigError::Invalid { key: KEY, value }),
        },
        Err(_) => Ok(default),
    }
}
