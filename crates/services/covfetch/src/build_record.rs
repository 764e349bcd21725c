//! Build record kept by covfetch and written out as a JSON report.

use std::path::Path;

use cov_defects::{BuildOutcome, FetchResult, ResultSink};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::prelude::*;

/// Report written once the defects have been fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub build_url: String,
    /// Final outcome, with the unstable flag folded in.
    pub outcome: BuildOutcome,
    pub unstable: bool,
    pub result: Option<FetchResult>,
}

/// Build state the defect fetcher operates on.
#[derive(Debug)]
pub struct BuildRecord {
    build_url: String,
    outcome: BuildOutcome,
    unstable: bool,
    result: Option<FetchResult>,
}

impl BuildRecord {
    pub fn new(build_url: impl Into<String>, outcome: BuildOutcome) -> Self {
        Self {
            build_url: build_url.into(),
            outcome,
            unstable: false,
            result: None,
        }
    }

    /// Close the record. An unstable build never improves a worse outcome.
    pub fn finish(self) -> BuildReport {
        let outcome = if self.unstable {
            self.outcome.combine(BuildOutcome::Unstable)
        } else {
            self.outcome
        };
        BuildReport {
            build_url: self.build_url,
            outcome,
            unstable: self.unstable,
            result: self.result,
        }
    }
}

impl ResultSink for BuildRecord {
    fn outcome(&self) -> BuildOutcome {
        self.outcome
    }

    fn set_outcome(&mut self, outcome: BuildOutcome) {
        self.outcome = outcome;
    }

    fn mark_unstable(&mut self) {
        self.unstable = true;
    }

    fn attach_result(&mut self, result: FetchResult) {
        self.result = Some(result);
    }

    fn url(&self) -> &str {
        &self.build_url
    }
}

impl BuildReport {
    /// Write the report as pretty printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        info!("Report written to {}", path.display());
        Ok(())
    }
}
