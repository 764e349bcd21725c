//! Defect fetching for build pipelines.
//!
//! After a build step committed its analysis results, [`DefectFetcher`] asks
//! the defect service for the defects of the configured stream, attaches
//! them to the build as a [`FetchResult`] and fails or destabilizes the build
//! according to the [`FetchConfiguration`](cov_config::FetchConfiguration).
//!
//! The build host is reached through the [`ResultSink`] and [`BuildListener`]
//! traits and the defect service through [`RemoteDefectService`], so the
//! fetcher can be driven by any build system.

pub mod build;
pub mod defect;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod http_service;
pub mod outcome;
pub mod prelude;
pub mod result;
pub mod service;

pub use build::{BuildListener, ResultSink, TracingListener};
pub use defect::{CoverityDefect, MergedDefect};
pub use fetcher::{DefectFetcher, FetchStatus, INITIAL_DEFECT_CAP, PAGE_SIZE};
pub use filter::MergedDefectFilterSpec;
pub use http_service::{HttpDefectService, LazyHttpDefectService};
pub use outcome::BuildOutcome;
pub use result::FetchResult;
pub use service::{MergedDefectsPage, PageSpec, RemoteDefectService, SnapshotScope, StreamId};
