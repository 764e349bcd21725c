//! Defect filter configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Filters narrowing down which defects the service returns.
///
/// Empty lists place no restriction on the corresponding attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefectFilters {
    /// Triage actions, e.g. `Undecided`, `Fix Required`.
    pub actions: Vec<String>,
    /// Triage classifications, e.g. `Unclassified`, `Bug`.
    pub classifications: Vec<String>,
    /// Triage severities, e.g. `Major`.
    pub severities: Vec<String>,
    /// Impact levels, e.g. `High`.
    pub impacts: Vec<String>,
    /// Component names, e.g. `Default.Other`.
    pub components: Vec<String>,
    /// Checker names, e.g. `NULL_RETURNS`.
    pub checkers: Vec<String>,
    /// Only defects first detected on or after this date.
    pub cut_off_date: Option<NaiveDate>,
}
