//! Defect service instance definitions.

use crate::prelude::*;
use serde::{Deserialize, Serialize};

/// Environment variable consulted when an instance has no password.
pub const PASSWORD_ENV: &str = "COVFETCH_PASSWORD";

/// A defect service instance reachable over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CovInstance {
    /// Name the stream configuration refers to.
    pub name: String,
    /// Base URL, e.g. `https://coverity.example.com:8443`.
    pub url: String,
    /// User name used for basic authentication.
    pub user: String,
    /// Password used for basic authentication.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

impl CovInstance {
    /// Resolve the password from the configuration, then from `COVFETCH_PASSWORD`.
    pub fn password(&self) -> Result<String> {
        self.password_or(std::env::var(PASSWORD_ENV).ok())
    }

    fn password_or(&self, fallback: Option<String>) -> Result<String> {
        self.password
            .clone()
            .or(fallback)
            .ok_or_else(|| Error::MissingPassword(self.name.clone()))
    }
}
