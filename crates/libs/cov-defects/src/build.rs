//! Interfaces to the build the defects are fetched for.

use std::error::Error as StdError;

use tracing::{error, info};

use crate::{outcome::BuildOutcome, result::FetchResult};

/// The build record receiving the fetched defects.
pub trait ResultSink {
    /// Current outcome of the build.
    fn outcome(&self) -> BuildOutcome;
    /// Overwrite the outcome of the build.
    fn set_outcome(&mut self, outcome: BuildOutcome);
    /// Flag the build as unstable.
    fn mark_unstable(&mut self);
    /// Attach a fetch result to the build.
    fn attach_result(&mut self, result: FetchResult);
    /// Path of the build relative to the host root URL, e.g. `job/demo/12/`.
    fn url(&self) -> &str;
}

/// Line oriented build log.
pub trait BuildListener {
    /// Append a line to the build log.
    fn println(&self, line: &str);
    /// Report an error together with its causes.
    fn error(&self, message: &str, error: &dyn StdError);
}

/// Renders an error followed by its chain of sources, one per line.
pub fn error_chain(error: &dyn StdError) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str("\n  caused by: ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

/// Listener writing the build log through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

impl BuildListener for TracingListener {
    fn println(&self, line: &str) {
        info!("{line}");
    }

    fn error(&self, message: &str, error: &dyn StdError) {
        error!("{message}\n{}", error_chain(error));
    }
}
