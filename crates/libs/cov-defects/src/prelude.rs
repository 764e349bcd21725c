//! Common types and utilities.

/// Defect fetching error type.
pub use crate::error::Error;

/// Defect fetching result type.
pub type Result<T> = core::result::Result<T, Error>;
