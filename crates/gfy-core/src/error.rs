//! Error type shared by the identifier resolver, both strategies and the plugin facade.

use thiserror::Error;

/// Failure raised while resolving a URL to downloadable content.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or unsupported URL (no path segment, unparseable ID).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// OAuth request failed or returned no usable token.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Item or page request resolved to a non-success response.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Expected page structure is missing.
    #[error("parse error: {0}")]
    Parse(String),

    /// API strategy enabled without credentials.
    #[error("configuration error: {0}")]
    Config(String),

    /// Manifest does not contain exactly one artifact.
    #[error("validation error: {0}")]
    Validation(String),

    /// The HTTP client could not complete the request at all.
    #[error("{method} {url}: {message}")]
    Transport {
        method: &'static str,
        url: String,
        message: String,
    },

    /// A response body was not the JSON we expected.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("token cache: {0}")]
    Cache(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
