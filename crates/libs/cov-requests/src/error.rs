//! HTTP client error types.

use reqwest::StatusCode;

/// HTTP client errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Transport level failure.
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The endpoint could not be turned into a valid URL.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("Request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },
}
