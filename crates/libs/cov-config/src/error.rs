//! Configuration error types.

/// Configuration errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error(transparent)]
    IO(#[from] std::io::Error),

    /// TOML deserialization failed.
    #[error(transparent)]
    Deserialization(#[from] toml::de::Error),

    /// The stream refers to an instance that is not configured.
    #[error("Instance '{0}' is not configured")]
    UnknownInstance(String),

    /// No password in the configuration file nor in the environment.
    #[error(
        "Password for instance '{0}' is missing. Set it in the configuration file or via the COVFETCH_PASSWORD environment variable"
    )]
    MissingPassword(String),
}
