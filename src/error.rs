use thiserror::Error;

/// Result alias for `canopy`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned while loading reports and configuration.
///
/// Selection, indexing and chart derivation never fail; only the I/O edges
/// of the crate produce these.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading a file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A report document or listing was not valid JSON for its shape.
    #[error("malformed report json: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration file was not valid TOML for its shape.
    #[error("malformed config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Transport-level HTTP failure.
    #[cfg(feature = "http")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The report API answered with an unexpected status.
    #[error("unexpected status {status} from {url}")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// Status code returned.
        status: u16,
    },

    /// The report API rejected the api key.
    #[error("unauthorized: report api rejected the api key")]
    Unauthorized,

    /// The requested report (or listing) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: String,
    },

    /// Configuration is incomplete or contradictory.
    #[error("configuration error: {0}")]
    Config(String),
}
