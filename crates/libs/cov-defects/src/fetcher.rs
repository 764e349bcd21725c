//! Fetching the defects of a stream after a build step.
//!
//! Defects are requested page by page from the most recent snapshot of the
//! stream. The first request is bounded by [`INITIAL_DEFECT_CAP`]; after that
//! the total reported by the service bounds the loop, so it may stop earlier
//! or continue past the initial cap.
//!
//! Pages are requested in ascending order and concatenated as received. If
//! the service ordering changes between two page requests (for instance while
//! defects are triaged), the result may contain duplicates or miss defects.

use cov_config::{FetchConfiguration, StreamTarget};
use tracing::{debug, info};

use crate::{
    build::{BuildListener, ResultSink},
    defect::{CoverityDefect, MergedDefect},
    filter::MergedDefectFilterSpec,
    outcome::BuildOutcome,
    prelude::*,
    result::FetchResult,
    service::{PageSpec, RemoteDefectService, SnapshotScope, StreamId},
};

/// Number of defects requested per page.
pub const PAGE_SIZE: u32 = 1000;

/// Bound of the first page request, before the service reported its total.
pub const INITIAL_DEFECT_CAP: u32 = 3000;

/// What a call to [`DefectFetcher::run`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Fetching is disabled by the configuration.
    SkippedByConfig,
    /// The target has no stream name.
    MissingStream,
    /// Defects were fetched and attached to the build.
    Completed { defects: usize },
    /// The service could not be queried; the build was failed.
    Failed,
}

/// Reads the latest defects of a stream and reports them on a build.
#[derive(Debug, Clone)]
pub struct DefectFetcher {
    config: FetchConfiguration,
    target: StreamTarget,
    root_url: Option<String>,
}

impl DefectFetcher {
    pub fn new(config: FetchConfiguration, target: StreamTarget) -> Self {
        Self {
            config,
            target,
            root_url: None,
        }
    }

    /// Root URL of the build host, used to log a link to the result.
    pub fn with_root_url(mut self, root_url: Option<String>) -> Self {
        self.root_url = root_url;
        self
    }

    /// Fetch the defects and update the build accordingly.
    ///
    /// Service errors are logged to `listener` and fail the build; they are
    /// not returned.
    pub async fn run<S, R, L>(&self, service: &S, sink: &mut R, listener: &L) -> FetchStatus
    where
        S: RemoteDefectService,
        R: ResultSink,
        L: BuildListener,
    {
        if self.config.skip_fetching {
            return FetchStatus::SkippedByConfig;
        }

        let Some(stream) = self.target.stream_name() else {
            listener.println("[Coverity] Stream has not been configured. Skipping fetching defects.");
            return FetchStatus::MissingStream;
        };

        listener.println(&format!(
            "[Coverity] Fetching defects for stream \"{stream}\""
        ));

        let defects = match self.defects_for_snapshot(service, stream, listener).await {
            Ok(defects) => defects,
            Err(err) => {
                listener.error("[Coverity] An error occurred while fetching defects", &err);
                sink.set_outcome(BuildOutcome::Failure);
                return FetchStatus::Failed;
            }
        };

        let matching: Vec<CoverityDefect> = defects.into_iter().map(CoverityDefect::from).collect();

        if !matching.is_empty() {
            listener.println(&format!(
                "[Coverity] Found {} defects matching all filters",
                matching.len()
            ));
            if self.config.fail_on_defects && sink.outcome().is_better_than(BuildOutcome::Failure) {
                sink.set_outcome(BuildOutcome::Failure);
            }
            if self.config.mark_unstable_on_defects {
                sink.mark_unstable();
            }
        } else {
            listener.println("[Coverity] No defects matched all filters.");
        }

        let count = matching.len();
        let result = FetchResult::new(
            sink.url(),
            &self.target.project,
            stream,
            &self.target.instance,
            matching,
        );
        let details = self
            .root_url
            .as_ref()
            .map(|root_url| format!("{root_url}{}{}", sink.url(), result.url_name()));
        sink.attach_result(result);

        if let Some(details) = details {
            listener.println(&format!("Coverity details: {details}"));
        }

        info!("Attached {count} defects of stream {stream} to build {}", sink.url());
        FetchStatus::Completed { defects: count }
    }

    async fn defects_for_snapshot<S, L>(
        &self,
        service: &S,
        stream: &str,
        listener: &L,
    ) -> Result<Vec<MergedDefect>>
    where
        S: RemoteDefectService,
        L: BuildListener,
    {
        let stream_ids = [StreamId::new(stream)];
        let filter = self
            .target
            .defect_filters
            .as_ref()
            .map(MergedDefectFilterSpec::from)
            .unwrap_or_default();
        let snapshot_scope = SnapshotScope::last();

        let mut defects = Vec::new();
        let mut total = INITIAL_DEFECT_CAP;
        let mut start = 0;
        while start < total {
            if start >= PAGE_SIZE {
                listener.println(&format!(
                    "[Coverity] Fetching defects for stream \"{stream}\" (fetched {start} of {total})"
                ));
            }

            let page_spec = PageSpec {
                page_size: PAGE_SIZE,
                start_index: start,
                sort_ascending: true,
            };
            debug!(
                "Requesting defects {start}..{} of stream {stream}",
                start.saturating_add(PAGE_SIZE)
            );
            let page = service
                .merged_defects_for_streams(&stream_ids, &filter, &page_spec, &snapshot_scope)
                .await?;

            total = page.total_number_of_records;
            defects.extend(page.merged_defects);
            let Some(next) = next_start(start) else {
                break;
            };
            start = next;
        }
        Ok(defects)
    }
}

/// Start index of the page after the one at `start`, `None` once the index
/// space of the service is exhausted.
fn next_start(start: u32) -> Option<u32> {
    start.checked_add(PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MergedDefectsPage;
    use cov_config::DefectFilters;
    use std::{
        cell::RefCell,
        collections::VecDeque,
        error::Error as StdError,
        sync::Mutex,
    };

    type Response = std::result::Result<MergedDefectsPageScript, String>;

    /// Page the scripted service answers with.
    struct MergedDefectsPageScript {
        total: u32,
        cids: Vec<i64>,
    }

    #[derive(Debug, Clone)]
    struct Request {
        stream_ids: Vec<StreamId>,
        filter: MergedDefectFilterSpec,
        page_spec: PageSpec,
        snapshot_scope: SnapshotScope,
    }

    #[derive(Default)]
    struct ScriptedService {
        responses: Mutex<VecDeque<Response>>,
        requests: Mutex<Vec<Request>>,
    }

    impl ScriptedService {
        fn new(responses: Vec<Response>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::default(),
            }
        }

        fn page(total: u32, cids: impl IntoIterator<Item = i64>) -> Response {
            Ok(MergedDefectsPageScript {
                total,
                cids: cids.into_iter().collect(),
            })
        }

        fn requests(&self) -> Vec<Request> {
            self.requests.lock().unwrap().clone()
        }

        fn start_indexes(&self) -> Vec<u32> {
            self.requests()
                .iter()
                .map(|request| request.page_spec.start_index)
                .collect()
        }
    }

    impl RemoteDefectService for ScriptedService {
        async fn merged_defects_for_streams(
            &self,
            stream_ids: &[StreamId],
            filter: &MergedDefectFilterSpec,
            page_spec: &PageSpec,
            snapshot_scope: &SnapshotScope,
        ) -> Result<MergedDefectsPage> {
            self.requests.lock().unwrap().push(Request {
                stream_ids: stream_ids.to_vec(),
                filter: filter.clone(),
                page_spec: *page_spec,
                snapshot_scope: snapshot_scope.clone(),
            });
            let response = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected page request");
            match response {
                Ok(script) => Ok(MergedDefectsPage {
                    total_number_of_records: script.total,
                    merged_defects: script.cids.into_iter().map(merged_defect).collect(),
                }),
                Err(message) => Err(Error::RemoteService {
                    error_code: 1300,
                    message,
                }),
            }
        }
    }

    fn merged_defect(cid: i64) -> MergedDefect {
        MergedDefect {
            cid,
            checker_name: String::from("NULL_RETURNS"),
            function_display_name: Some(format!("function_{cid}")),
            file_pathname: Some(format!("/src/file_{cid}.c")),
        }
    }

    struct RecordingBuild {
        outcome: BuildOutcome,
        unstable: bool,
        results: Vec<FetchResult>,
    }

    impl RecordingBuild {
        fn new(outcome: BuildOutcome) -> Self {
            Self {
                outcome,
                unstable: false,
                results: Vec::new(),
            }
        }
    }

    impl ResultSink for RecordingBuild {
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
            self.results.push(result);
        }

        fn url(&self) -> &str {
            "job/demo/12/"
        }
    }

    #[derive(Default)]
    struct RecordingListener {
        lines: RefCell<Vec<String>>,
        errors: RefCell<Vec<String>>,
    }

    impl BuildListener for RecordingListener {
        fn println(&self, line: &str) {
            self.lines.borrow_mut().push(String::from(line));
        }

        fn error(&self, message: &str, error: &dyn StdError) {
            self.errors.borrow_mut().push(format!("{message}: {error}"));
        }
    }

    fn target(stream: Option<&str>) -> StreamTarget {
        StreamTarget {
            instance: String::from("main"),
            project: String::from("demo"),
            stream: stream.map(String::from),
            defect_filters: None,
        }
    }

    fn config(fail_on_defects: bool, mark_unstable_on_defects: bool) -> FetchConfiguration {
        FetchConfiguration {
            skip_fetching: false,
            fail_on_defects,
            mark_unstable_on_defects,
        }
    }

    #[tokio::test]
    async fn skip_fetching_does_nothing() {
        let service = ScriptedService::default();
        let mut build = RecordingBuild::new(BuildOutcome::Success);
        let listener = RecordingListener::default();
        let config = FetchConfiguration {
            skip_fetching: true,
            fail_on_defects: true,
            mark_unstable_on_defects: true,
        };

        let status = DefectFetcher::new(config, target(Some("demo")))
            .run(&service, &mut build, &listener)
            .await;

        assert_eq!(status, FetchStatus::SkippedByConfig);
        assert!(service.requests().is_empty());
        assert!(build.results.is_empty());
        assert_eq!(build.outcome, BuildOutcome::Success);
        assert!(!build.unstable);
        assert!(listener.lines.borrow().is_empty());
    }

    #[tokio::test]
    async fn missing_stream_is_skipped() {
        for stream in [None, Some("")] {
            let service = ScriptedService::default();
            let mut build = RecordingBuild::new(BuildOutcome::Success);
            let listener = RecordingListener::default();

            let status = DefectFetcher::new(config(true, true), target(stream))
                .run(&service, &mut build, &listener)
                .await;

            assert_eq!(status, FetchStatus::MissingStream);
            assert!(service.requests().is_empty());
            assert!(build.results.is_empty());
            assert_eq!(build.outcome, BuildOutcome::Success);
            assert_eq!(
                *listener.lines.borrow(),
                vec!["[Coverity] Stream has not been configured. Skipping fetching defects."]
            );
        }
    }

    #[tokio::test]
    async fn single_page_fails_build() {
        let service = ScriptedService::new(vec![ScriptedService::page(2, [101, 102])]);
        let mut build = RecordingBuild::new(BuildOutcome::Success);
        let listener = RecordingListener::default();

        let status = DefectFetcher::new(config(true, false), target(Some("demo")))
            .run(&service, &mut build, &listener)
            .await;

        assert_eq!(status, FetchStatus::Completed { defects: 2 });
        assert_eq!(build.outcome, BuildOutcome::Failure);
        assert!(!build.unstable);

        let result = &build.results[0];
        assert_eq!(build.results.len(), 1);
        assert_eq!(result.build, "job/demo/12/");
        assert_eq!(result.project, "demo");
        assert_eq!(result.stream, "demo");
        assert_eq!(result.instance, "main");
        assert_eq!(
            result.defects,
            vec![
                CoverityDefect {
                    cid: 101,
                    checker_name: String::from("NULL_RETURNS"),
                    function_name: Some(String::from("function_101")),
                    file_path: Some(String::from("/src/file_101.c")),
                },
                CoverityDefect {
                    cid: 102,
                    checker_name: String::from("NULL_RETURNS"),
                    function_name: Some(String::from("function_102")),
                    file_path: Some(String::from("/src/file_102.c")),
                },
            ]
        );

        let requests = service.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].stream_ids, vec![StreamId::new("demo")]);
        assert_eq!(requests[0].filter, MergedDefectFilterSpec::default());
        assert_eq!(requests[0].snapshot_scope, SnapshotScope::last());
        assert_eq!(
            requests[0].page_spec,
            PageSpec {
                page_size: PAGE_SIZE,
                start_index: 0,
                sort_ascending: true,
            }
        );
        assert_eq!(
            *listener.lines.borrow(),
            vec![
                "[Coverity] Fetching defects for stream \"demo\"",
                "[Coverity] Found 2 defects matching all filters",
            ]
        );
    }

    #[tokio::test]
    async fn pages_until_reported_total() {
        let service = ScriptedService::new(vec![
            ScriptedService::page(2500, 0..1000),
            ScriptedService::page(2500, 1000..2000),
            ScriptedService::page(2500, 2000..2500),
        ]);
        let mut build = RecordingBuild::new(BuildOutcome::Success);
        let listener = RecordingListener::default();

        let status = DefectFetcher::new(config(false, false), target(Some("demo")))
            .run(&service, &mut build, &listener)
            .await;

        assert_eq!(status, FetchStatus::Completed { defects: 2500 });
        assert_eq!(service.start_indexes(), vec![0, 1000, 2000]);
        let cids: Vec<i64> = build.results[0].defects.iter().map(|d| d.cid).collect();
        assert_eq!(cids, (0..2500_i64).collect::<Vec<_>>());
        assert!(listener.lines.borrow().contains(&String::from(
            "[Coverity] Fetching defects for stream \"demo\" (fetched 1000 of 2500)"
        )));
        assert!(listener.lines.borrow().contains(&String::from(
            "[Coverity] Fetching defects for stream \"demo\" (fetched 2000 of 2500)"
        )));
    }

    #[tokio::test]
    async fn shrinking_total_stops_early() {
        let service = ScriptedService::new(vec![
            ScriptedService::page(5000, 0..1000),
            ScriptedService::page(1200, 1000..1200),
        ]);
        let mut build = RecordingBuild::new(BuildOutcome::Success);
        let listener = RecordingListener::default();

        let status = DefectFetcher::new(config(false, false), target(Some("demo")))
            .run(&service, &mut build, &listener)
            .await;

        assert_eq!(status, FetchStatus::Completed { defects: 1200 });
        assert_eq!(service.start_indexes(), vec![0, 1000]);
        assert_eq!(build.results[0].len(), 1200);
    }

    #[tokio::test]
    async fn growing_total_exceeds_initial_cap() {
        let service = ScriptedService::new(vec![
            ScriptedService::page(4500, 0..1000),
            ScriptedService::page(4500, 1000..2000),
            ScriptedService::page(4500, 2000..3000),
            ScriptedService::page(4500, 3000..4000),
            ScriptedService::page(4500, 4000..4500),
        ]);
        let mut build = RecordingBuild::new(BuildOutcome::Success);
        let listener = RecordingListener::default();

        let status = DefectFetcher::new(config(false, false), target(Some("demo")))
            .run(&service, &mut build, &listener)
            .await;

        assert_eq!(status, FetchStatus::Completed { defects: 4500 });
        assert_eq!(service.start_indexes(), vec![0, 1000, 2000, 3000, 4000]);
    }

    #[test]
    fn start_index_stops_at_end_of_range() {
        assert_eq!(next_start(0), Some(PAGE_SIZE));
        assert_eq!(next_start(u32::MAX - PAGE_SIZE), Some(u32::MAX));
        assert_eq!(next_start(u32::MAX - PAGE_SIZE + 1), None);
        assert_eq!(next_start(u32::MAX), None);
    }

    #[tokio::test]
    async fn failure_is_never_downgraded() {
        for current in [BuildOutcome::Failure, BuildOutcome::NotBuilt, BuildOutcome::Aborted] {
            let service = ScriptedService::new(vec![ScriptedService::page(1, [7])]);
            let mut build = RecordingBuild::new(current);
            let listener = RecordingListener::default();

            DefectFetcher::new(config(true, false), target(Some("demo")))
                .run(&service, &mut build, &listener)
                .await;

            assert_eq!(build.outcome, current);
        }
    }

    #[tokio::test]
    async fn unstable_is_flagged_alongside_failure() {
        let service = ScriptedService::new(vec![ScriptedService::page(1, [7])]);
        let mut build = RecordingBuild::new(BuildOutcome::Unstable);
        let listener = RecordingListener::default();

        DefectFetcher::new(config(true, true), target(Some("demo")))
            .run(&service, &mut build, &listener)
            .await;

        assert_eq!(build.outcome, BuildOutcome::Failure);
        assert!(build.unstable);
    }

    #[tokio::test]
    async fn unstable_without_failing() {
        let service = ScriptedService::new(vec![ScriptedService::page(1, [7])]);
        let mut build = RecordingBuild::new(BuildOutcome::Success);
        let listener = RecordingListener::default();

        DefectFetcher::new(config(false, true), target(Some("demo")))
            .run(&service, &mut build, &listener)
            .await;

        assert_eq!(build.outcome, BuildOutcome::Success);
        assert!(build.unstable);
    }

    #[tokio::test]
    async fn no_defects_still_attaches_result() {
        let service = ScriptedService::new(vec![ScriptedService::page(0, [])]);
        let mut build = RecordingBuild::new(BuildOutcome::Success);
        let listener = RecordingListener::default();

        let status = DefectFetcher::new(config(true, true), target(Some("demo")))
            .with_root_url(Some(String::from("https://ci.example.com/")))
            .run(&service, &mut build, &listener)
            .await;

        assert_eq!(status, FetchStatus::Completed { defects: 0 });
        assert_eq!(build.outcome, BuildOutcome::Success);
        assert!(!build.unstable);
        assert_eq!(build.results.len(), 1);
        assert!(build.results[0].is_empty());
        assert_eq!(
            *listener.lines.borrow(),
            vec![
                "[Coverity] Fetching defects for stream \"demo\"",
                "[Coverity] No defects matched all filters.",
                "Coverity details: https://ci.example.com/job/demo/12/coverity_defects",
            ]
        );
    }

    #[tokio::test]
    async fn service_error_fails_build_without_result() {
        let service = ScriptedService::new(vec![
            ScriptedService::page(5000, 0..1000),
            Err(String::from("stream not found")),
        ]);
        let mut build = RecordingBuild::new(BuildOutcome::Success);
        let listener = RecordingListener::default();

        let status = DefectFetcher::new(config(false, false), target(Some("demo")))
            .run(&service, &mut build, &listener)
            .await;

        assert_eq!(status, FetchStatus::Failed);
        assert_eq!(build.outcome, BuildOutcome::Failure);
        assert!(!build.unstable);
        assert!(build.results.is_empty());
        assert_eq!(
            *listener.errors.borrow(),
            vec![
                "[Coverity] An error occurred while fetching defects: Defect service error 1300: stream not found"
            ]
        );
    }

    #[tokio::test]
    async fn configured_filters_are_sent() {
        let service = ScriptedService::new(vec![ScriptedService::page(0, [])]);
        let mut build = RecordingBuild::new(BuildOutcome::Success);
        let listener = RecordingListener::default();
        let filters = DefectFilters {
            impacts: vec![String::from("High")],
            ..DefectFilters::default()
        };
        let target = StreamTarget {
            defect_filters: Some(filters.clone()),
            ..target(Some("demo"))
        };

        DefectFetcher::new(config(false, false), target)
            .run(&service, &mut build, &listener)
            .await;

        assert_eq!(
            service.requests()[0].filter,
            MergedDefectFilterSpec::from(&filters)
        );
    }
}
