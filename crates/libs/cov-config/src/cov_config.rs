//! Core configuration types for covfetch.

use crate::{cov_instance::CovInstance, cov_stream::StreamTarget, prelude::*};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Global configuration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CovGlobalConfig {
    /// Configuration version.
    pub version: String,
    /// Root URL of the build host, used to print links to fetched results.
    #[serde(default)]
    pub root_url: Option<String>,
}

/// Pass criteria applied once defects have been fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfiguration {
    /// Never contact the defect service.
    pub skip_fetching: bool,
    /// Fail the build when at least one defect matches.
    pub fail_on_defects: bool,
    /// Flag the build unstable when at least one defect matches.
    pub mark_unstable_on_defects: bool,
}

/// User-provided configuration from TOML files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CovUserConfig {
    /// Global settings.
    pub global: CovGlobalConfig,
    /// Known defect service instances.
    #[serde(default)]
    pub instances: Vec<CovInstance>,
    /// Fetch pass criteria.
    #[serde(default)]
    pub fetch: FetchConfiguration,
    /// Stream whose defects are fetched.
    pub stream: StreamTarget,
}

impl CovUserConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(file_path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", file_path.display());
        let contents = std::fs::read_to_string(file_path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML string.
    pub fn from_toml(value: &str) -> Result<Self> {
        Ok(toml::from_str(value)?)
    }

    /// Look up an instance by name.
    pub fn instance(&self, name: &str) -> Result<&CovInstance> {
        self.instances
            .iter()
            .find(|instance| instance.name == name)
            .ok_or_else(|| Error::UnknownInstance(name.to_string()))
    }

    /// The instance the configured stream lives on.
    pub fn target_instance(&self) -> Result<&CovInstance> {
        self.instance(&self.stream.instance)
    }
}
