use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "OrganizaMed";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ADDR_VAR: &str = "ORGANIZAMED_ADDR";
pub const ALLOWED_ORIGINS_VAR: &str = "ORGANIZAMED_ALLOWED_ORIGINS";

const DEFAULT_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:4200,http://127.0.0.1:4200";

/// Default tracing filter, used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,organizamed_lib=debug"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} is not a socket address: {value:?}")]
    InvalidAddr {
        var: &'static str,
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("ORGANIZAMED_ALLOWED_ORIGINS contains an invalid origin: {0:?}")]
    InvalidOrigin(String),

    #[error("ORGANIZAMED_ALLOWED_ORIGINS lists no origins")]
    NoOrigins,
}

/// HTTP adapter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Origins allowed by CORS, e.g. `http://localhost:4200`.
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Read settings from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_addr = non_blank(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = raw_addr
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidAddr {
                var: ADDR_VAR,
                value: raw_addr.clone(),
                source,
            })?;

        let raw_origins =
            non_blank(ALLOWED_ORIGINS_VAR).unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string());
        let allowed_origins = parse_origins(&raw_origins)?;

        Ok(Self {
            addr,
            allowed_origins,
        })
    }

    /// Origins as header values, ready for the CORS layer.
    pub fn origin_headers(&self) -> Result<Vec<HeaderValue>, ConfigError> {
        self.allowed_origins
            .iter()
            .map(|o| HeaderValue::from_str(o).map_err(|_| ConfigError::InvalidOrigin(o.clone())))
            .collect()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .split(',')
                .map(str::to_string)
                .collect(),
        }
    }
}

fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|o| o.trim_end_matches('/').to_string())
        .collect();

    if origins.is_empty() {
        return Err(ConfigError::NoOrigins);
    }

    for origin in &origins {
        let scheme_ok = origin.starts_with("http://") || origin.starts_with("https://");
        if !scheme_ok || HeaderValue::from_str(origin).is_err() {
            return Err(ConfigError::InvalidOrigin(origin.clone()));
        }
    }

    Ok(origins)
}
