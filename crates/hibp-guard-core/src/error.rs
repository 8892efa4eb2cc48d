//! Error types and handling for hibp-guard-core operations.
//!
//! Errors fall into three classes that drive the checker's policy:
//!
//! - **Network errors** (`Network`, `Status`, `Timeout`): the remote range
//!   service could not answer. The checker recovers locally and reports the
//!   credential as safe.
//! - **Cache errors** (`Cache`): the shared cache store failed. Treated the
//!   same way as network errors.
//! - **Configuration errors** (`Config`, `InvalidUrl`, `Serialization`): a rule
//!   or config file is malformed. These always surface to the integrator.
//!
//! Malformed response lines never become errors; the parser drops them.
//!
//! ```rust
//! use hibp_guard_core::Error;
//!
//! let err = Error::Config("bad rule".to_string());
//! assert_eq!(err.category(), "config");
//! assert!(!err.is_fail_open());
//! ```

use thiserror::Error;

/// The main error type for hibp-guard-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed (config file access).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level failure talking to the range service.
    ///
    /// Connection refused, DNS failure, TLS errors and body decoding failures
    /// all land here. Timeouts are split out into [`Error::Timeout`].
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The range service answered with a non-2xx status.
    #[error("Range request for prefix {prefix} failed with HTTP {status}")]
    Status {
        /// HTTP status code returned by the service.
        status: u16,
        /// Hash prefix that was requested.
        prefix: String,
    },

    /// The range request exceeded the configured client timeout.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The cache store could not be read or written.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Rule parameters or configuration are invalid.
    ///
    /// ## Common Causes
    ///
    /// - More than one rule parameter (`min=1,max=1`)
    /// - A parameter other than `min=`
    /// - Unknown rule name in a rule string
    /// - Invalid TOML in the config file
    #[error("Configuration error: {0}")]
    Config(String),

    /// Endpoint URL is malformed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error for uncategorized failures.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable through retry logic.
    ///
    /// The checker itself never retries; this is for callers that want to
    /// schedule a later re-check.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Timeout(_) | Self::Cache(_) => true,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Whether a check that hit this error should downgrade to "safe".
    ///
    /// Runtime failures of third parties (range service, cache store) are
    /// fail-open. Configuration mistakes are not.
    #[must_use]
    pub const fn is_fail_open(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Status { .. } | Self::Timeout(_) | Self::Cache(_)
        )
    }

    /// Get the error category as a string identifier for logging.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::Status { .. } => "status",
            Self::Timeout(_) => "timeout",
            Self::Cache(_) => "cache",
            Self::Config(_) => "config",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Serialization(_) => "serialization",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
