//! Translation of configured defect filters into the service filter shape.

use chrono::NaiveDate;
use cov_config::DefectFilters;
use serde::{Deserialize, Serialize};

/// Identifies a component on the defect service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentId {
    pub name: String,
}

/// Filter applied by the service to merged defects.
///
/// The default value places no restriction at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedDefectFilterSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub action_name_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classification_name_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub severity_name_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub impact_name_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub component_id_list: Vec<ComponentId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checker_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_detected_start_date: Option<NaiveDate>,
}

impl From<&DefectFilters> for MergedDefectFilterSpec {
    fn from(filters: &DefectFilters) -> Self {
        Self {
            action_name_list: filters.actions.clone(),
            classification_name_list: filters.classifications.clone(),
            severity_name_list: filters.severities.clone(),
            impact_name_list: filters.impacts.clone(),
            component_id_list: filters
                .components
                .iter()
                .map(|name| ComponentId { name: name.clone() })
                .collect(),
            checker_list: filters.checkers.clone(),
            first_detected_start_date: filters.cut_off_date,
        }
    }
}
