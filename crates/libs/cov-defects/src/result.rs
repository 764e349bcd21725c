//! Fetch result attached to builds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::defect::CoverityDefect;

/// Defects of a stream attached to a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResult {
    /// Build the result belongs to.
    pub build: String,
    pub project: String,
    pub stream: String,
    pub instance: String,
    /// Defects in the order reported by the service.
    pub defects: Vec<CoverityDefect>,
}

impl FetchResult {
    /// Address segment of the result below the build URL.
    pub const URL_NAME: &'static str = "coverity_defects";

    pub fn new(
        build: impl Into<String>,
        project: impl Into<String>,
        stream: impl Into<String>,
        instance: impl Into<String>,
        defects: Vec<CoverityDefect>,
    ) -> Self {
        Self {
            build: build.into(),
            project: project.into(),
            stream: stream.into(),
            instance: instance.into(),
            defects,
        }
    }

    pub fn url_name(&self) -> &'static str {
        Self::URL_NAME
    }

    pub fn len(&self) -> usize {
        self.defects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defects.is_empty()
    }

    /// Number of defects per checker, sorted by checker name.
    pub fn defects_by_checker(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for defect in &self.defects {
            *counts.entry(defect.checker_name.as_str()).or_insert(0) += 1;
        }
        counts
    }
}
