//! Defect service interface and its request/response objects.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{defect::MergedDefect, filter::MergedDefectFilterSpec, prelude::*};

/// Identifies a stream on the defect service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamId {
    pub name: String,
}

impl StreamId {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Which slice of the result set a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    pub page_size: u32,
    pub start_index: u32,
    pub sort_ascending: bool,
}

/// Which snapshots of the stream are considered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotScope {
    pub show_selector: String,
}

impl SnapshotScope {
    /// Only the most recent snapshot.
    pub fn last() -> Self {
        Self {
            show_selector: String::from("last()"),
        }
    }
}

/// One page of merged defects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedDefectsPage {
    /// Number of records matching the request across all pages.
    pub total_number_of_records: u32,
    #[serde(default)]
    pub merged_defects: Vec<MergedDefect>,
}

/// A defect service able to list the merged defects of streams.
pub trait RemoteDefectService {
    /// Fetch one page of the defects matching `filter` in the given streams.
    fn merged_defects_for_streams(
        &self,
        stream_ids: &[StreamId],
        filter: &MergedDefectFilterSpec,
        page_spec: &PageSpec,
        snapshot_scope: &SnapshotScope,
    ) -> impl Future<Output = Result<MergedDefectsPage>> + Send;
}
