//! Defect service reached over JSON/HTTP.

use cov_config::{CovInstance, CovUserConfig};
use cov_requests::ApiClient;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::{
    filter::MergedDefectFilterSpec,
    prelude::*,
    service::{MergedDefectsPage, PageSpec, RemoteDefectService, SnapshotScope, StreamId},
};

/// Endpoint listing the merged defects of streams.
pub const MERGED_DEFECTS_ENDPOINT: &str = "api/v1/mergedDefectsForStreams";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MergedDefectsRequest<'a> {
    stream_ids: &'a [StreamId],
    filter_spec: &'a MergedDefectFilterSpec,
    page_spec: &'a PageSpec,
    snapshot_scope: &'a SnapshotScope,
}

/// Error body returned by the service alongside a non-success status.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceFault {
    error_code: i32,
    message: String,
}

/// [`RemoteDefectService`] talking to an instance over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDefectService {
    client: ApiClient,
}

impl HttpDefectService {
    /// Connect to `instance`, authenticating with its user and password.
    pub fn new(instance: &CovInstance) -> Result<Self> {
        let client =
            ApiClient::new(&instance.url)?.with_basic_auth(&instance.user, instance.password()?);
        Ok(Self { client })
    }
}

impl RemoteDefectService for HttpDefectService {
    async fn merged_defects_for_streams(
        &self,
        stream_ids: &[StreamId],
        filter: &MergedDefectFilterSpec,
        page_spec: &PageSpec,
        snapshot_scope: &SnapshotScope,
    ) -> Result<MergedDefectsPage> {
        let request = MergedDefectsRequest {
            stream_ids,
            filter_spec: filter,
            page_spec,
            snapshot_scope,
        };
        debug!(
            "POST {}/{MERGED_DEFECTS_ENDPOINT} start={} size={}",
            self.client.url(),
            page_spec.start_index,
            page_spec.page_size
        );

        match self.client.post_json(MERGED_DEFECTS_ENDPOINT, &request).await {
            Ok(page) => Ok(page),
            Err(cov_requests::Error::Status { status, body }) => {
                match serde_json::from_str::<ServiceFault>(&body) {
                    Ok(fault) => Err(Error::RemoteService {
                        error_code: fault.error_code,
                        message: fault.message,
                    }),
                    Err(_) => Err(cov_requests::Error::Status { status, body }.into()),
                }
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// [`HttpDefectService`] for the target instance of a configuration,
/// connected on the first request.
///
/// An unknown instance or a missing password surfaces as an
/// [`Error::Config`] from that request. Nothing is resolved if no request is
/// made, so a skipped fetch does not need a usable instance.
#[derive(Debug)]
pub struct LazyHttpDefectService<'a> {
    config: &'a CovUserConfig,
    service: OnceCell<HttpDefectService>,
}

impl<'a> LazyHttpDefectService<'a> {
    pub fn new(config: &'a CovUserConfig) -> Self {
        Self {
            config,
            service: OnceCell::new(),
        }
    }

    async fn connect(&self) -> Result<&HttpDefectService> {
        self.service
            .get_or_try_init(|| async {
                self.config
                    .target_instance()
                    .map_err(Error::from)
                    .and_then(HttpDefectService::new)
            })
            .await
    }
}

impl RemoteDefectService for LazyHttpDefectService<'_> {
    async fn merged_defects_for_streams(
        &self,
        stream_ids: &[StreamId],
        filter: &MergedDefectFilterSpec,
        page_spec: &PageSpec,
        snapshot_scope: &SnapshotScope,
    ) -> Result<MergedDefectsPage> {
        self.connect()
            .await?
            .merged_defects_for_streams(stream_ids, filter, page_spec, snapshot_scope)
            .await
    }
}
