//! Build outcome severities.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Outcome of a build, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildOutcome {
    Success,
    Unstable,
    Failure,
    NotBuilt,
    Aborted,
}

impl BuildOutcome {
    /// Whether `self` is strictly less severe than `other`.
    pub fn is_better_than(self, other: BuildOutcome) -> bool {
        self < other
    }

    /// The worse of both outcomes.
    pub fn combine(self, other: BuildOutcome) -> BuildOutcome {
        self.max(other)
    }
}

impl fmt::Display for BuildOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildOutcome::Success => "success",
            BuildOutcome::Unstable => "unstable",
            BuildOutcome::Failure => "failure",
            BuildOutcome::NotBuilt => "not-built",
            BuildOutcome::Aborted => "aborted",
        };
        write!(f, "{name}")
    }
}

impl FromStr for BuildOutcome {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "success" => Ok(BuildOutcome::Success),
            "unstable" => Ok(BuildOutcome::Unstable),
            "failure" => Ok(BuildOutcome::Failure),
            "not-built" | "not_built" => Ok(BuildOutcome::NotBuilt),
            "aborted" => Ok(BuildOutcome::Aborted),
            _ => Err(Error::InvalidOutcome(String::from(value))),
        }
    }
}
