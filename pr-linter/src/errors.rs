//! Crate-wide error hierarchy for pr-linter.
//!
//! Goals:
//! - Single root `Error` for all public functions.
//! - Collaborator-aware mapping (401→Unauthorized, 429→RateLimited, 5xx→Server, etc.).
//! - Ergonomic `?` via `From` impls, no dynamic dispatch.
//!
//! Policy violations (missing key, disallowed status) are *not* errors:
//! they accumulate into the final verdict. Only configuration, context
//! and transport faults travel through this hierarchy.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type LintResult<T> = Result<T, Error>;

/// Root error type for the pr-linter crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Collaborator (tracker / code host) transport failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Configuration problems (bad/missing tokens, ignore pattern, etc.).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The triggering event is unusable (no pull request, bad repo slug).
    #[error("context error: {0}")]
    Context(String),

    /// Input validation errors when nothing more specific fits.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Detailed collaborator-specific error used inside the client layer.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Unauthorized (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden (HTTP 403).
    #[error("forbidden")]
    Forbidden,

    /// Not found (HTTP 404).
    #[error("not found")]
    NotFound,

    /// Rate limited (HTTP 429).
    #[error("rate limited")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Gateway/Server error (HTTP 5xx).
    #[error("server error: status {0}")]
    Server(u16),

    /// Other HTTP status (4xx/3xx) not covered above.
    #[error("http status error: {0}")]
    HttpStatus(u16),

    /// Timeout at transport level.
    #[error("timeout")]
    Timeout,

    /// Network/transport failure without status (DNS/connect/reset).
    #[error("network error: {0}")]
    Network(String),
}

/// Configuration and setup errors (base API URL, missing token, etc.).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing {0} token")]
    MissingToken(&'static str),

    #[error("invalid base api url: {0}")]
    InvalidBaseUrl(String),

    #[error("invalid branch ignore pattern: {0}")]
    InvalidIgnorePattern(String),
}

// ===== Conversions for `?` ergonomics =====

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Provider(ProviderError::from(e))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return ProviderError::Timeout;
        }
        if let Some(status) = e.status() {
            let code = status.as_u16();
            return match code {
                401 => ProviderError::Unauthorized,
                403 => ProviderError::Forbidden,
                404 => ProviderError::NotFound,
                429 => ProviderError::RateLimited {
                    retry_after_secs: None,
                },
                500..=599 => ProviderError::Server(code),
                _ => ProviderError::HttpStatus(code),
            };
        }
        ProviderError::Network(e.to_string())
    }
}
