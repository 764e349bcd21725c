//! Stream target configuration.

use crate::defect_filters::DefectFilters;
use serde::{Deserialize, Serialize};

/// Identifies the stream whose defects are fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamTarget {
    /// Name of the instance hosting the stream.
    pub instance: String,
    /// Project the stream belongs to.
    pub project: String,
    /// Stream name. Fetching is skipped when unset or empty.
    #[serde(default)]
    pub stream: Option<String>,
    /// Server side filters applied to the fetched defects.
    #[serde(default)]
    pub defect_filters: Option<DefectFilters>,
}

impl StreamTarget {
    /// The stream name, or `None` when it is unset or empty.
    pub fn stream_name(&self) -> Option<&str> {
        self.stream.as_deref().filter(|name| !name.is_empty())
    }
}
