//! Defect representations.

use serde::{Deserialize, Serialize};

/// A defect occurrence as reported by the defect service.
///
/// The service leaves the function and file unset for defects that are not
/// tied to a source location, so both are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedDefect {
    /// Defect identifier.
    pub cid: i64,
    pub checker_name: String,
    #[serde(default)]
    pub function_display_name: Option<String>,
    #[serde(default)]
    pub file_pathname: Option<String>,
}

/// A defect attached to a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverityDefect {
    pub cid: i64,
    pub checker_name: String,
    pub function_name: Option<String>,
    pub file_path: Option<String>,
}

impl From<MergedDefect> for CoverityDefect {
    fn from(defect: MergedDefect) -> Self {
        Self {
            cid: defect.cid,
            checker_name: defect.checker_name,
            function_name: defect.function_display_name,
            file_path: defect.file_pathname,
        }
    }
}
