use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("count must be greater than 0")]
    InvalidCount,

    #[error("start must be greater than 0")]
    InvalidStart,

    #[error("page size must be between 1 and {max}, got {got}")]
    InvalidPageSize { got: u32, max: u32 },

    #[error("range starting at {start} with {count} sites runs past rank {max}", max = u32::MAX)]
    RangeOverflow { start: u32, count: u32 },

    #[error("country code must be two ASCII letters, got {0:?}")]
    InvalidCountryCode(String),

    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("failed to sign request: {0}")]
    Signing(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Error document returned by the service.
    #[error("service returned {code}: {message}")]
    Api { code: String, message: String },

    #[error("malformed XML response: {0}")]
    Xml(String),

    #[error("site entry is missing <{0}>")]
    MissingField(&'static str),

    #[error("invalid rank {0:?}")]
    InvalidRank(String),

    #[error("failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize ranking: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to print ranking: {0}")]
    Io(#[from] std::io::Error),
}
