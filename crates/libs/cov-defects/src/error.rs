//! Defect fetching error types.

/// Errors raised while talking to the defect service.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The HTTP request failed or the server answered with an error status.
    #[error(transparent)]
    Request(#[from] cov_requests::Error),

    /// The service reported a fault for the request.
    #[error("Defect service error {error_code}: {message}")]
    RemoteService { error_code: i32, message: String },

    /// The instance configuration is unusable.
    #[error(transparent)]
    Config(#[from] cov_config::error::Error),

    /// JSON serialization/deserialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Unknown build outcome name.
    #[error("Invalid build outcome '{0}'")]
    InvalidOutcome(String),
}
