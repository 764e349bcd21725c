//! Command handlers for covfetch.

use std::path::Path;

use cov_config::CovUserConfig;
use cov_defects::{BuildOutcome, DefectFetcher, FetchStatus, LazyHttpDefectService, TracingListener};
use tracing::info;

use crate::build_record::{BuildRecord, BuildReport};
use crate::prelude::*;

/// Handles the parse command to display configuration information.
pub fn handle_parse(config: &CovUserConfig) -> Result<()> {
    println!("Configuration parsed successfully");
    println!("Global version: {}", config.global.version);
    if let Some(root_url) = &config.global.root_url {
        println!("Root URL: {root_url}");
    }

    println!("Number of instances: {}", config.instances.len());
    for instance in &config.instances {
        println!("  {}: {} (user {})", instance.name, instance.url, instance.user);
    }

    println!("\nFetch configuration");
    println!("  Skip fetching: {}", config.fetch.skip_fetching);
    println!("  Fail on defects: {}", config.fetch.fail_on_defects);
    println!("  Mark unstable on defects: {}", config.fetch.mark_unstable_on_defects);

    let stream = &config.stream;
    println!("\nStream");
    println!("  Instance: {}", stream.instance);
    println!("  Project: {}", stream.project);
    println!("  Stream: {}", stream.stream_name().unwrap_or("<not configured>"));
    if let Some(filters) = &stream.defect_filters {
        println!("  Filters: {filters:?}");
    }

    config.target_instance()?;
    Ok(())
}

/// Handles the fetch command.
///
/// Runs the defect fetcher for the configured stream, prints a summary and
/// writes the report to `output`.
pub async fn handle_fetch(
    config: &CovUserConfig,
    build_url: String,
    outcome: BuildOutcome,
    output: &Path,
) -> Result<BuildReport> {
    let fetcher = DefectFetcher::new(config.fetch, config.stream.clone())
        .with_root_url(config.global.root_url.clone());
    let mut record = BuildRecord::new(build_url, outcome);
    let service = LazyHttpDefectService::new(config);

    let status = fetcher.run(&service, &mut record, &TracingListener).await;
    info!("Fetch finished: {status:?}");

    let report = record.finish();
    if let FetchStatus::Completed { defects } = status {
        println!("{defects} defect(s) in stream");
        if let Some(result) = &report.result {
            for (checker, count) in result.defects_by_checker() {
                println!("  {checker}: {count}");
            }
        }
    }
    println!("Build outcome: {}", report.outcome);
    report.save(output)?;
    Ok(report)
}
