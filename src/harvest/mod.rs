pub mod enumerator;
pub mod orchestrator;
pub mod paginator;
pub mod reconciler;

pub use enumerator::{list_recent, RecentLogFiles};
pub use orchestrator::{Harvester, RunAborted};
pub use paginator::{fetch, FetchOutcome};
pub use reconciler::{plan, FetchPlan, PlannedFetch};

use crate::pipeline::PipelineError;
use crate::remote::RemoteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("no log files found for instance '{instance_id}'")]
    NoLogFilesFound { instance_id: String },

    #[error("failed to list log files for instance '{instance_id}': {source}")]
    Listing {
        instance_id: String,
        #[source]
        source: RemoteError,
    },

    #[error("failed to download '{log_file}' for instance '{instance_id}': {source}")]
    Download {
        instance_id: String,
        log_file: String,
        #[source]
        source: RemoteError,
    },

    #[error("sink error: {0}")]
    Sink(#[from] PipelineError),
}

impl HarvestError {
    /// Errors that end the whole run under the abort policy.
    pub fn is_missing_logs(&self) -> bool {
        matches!(
            self,
            HarvestError::NoLogFilesFound { .. } | HarvestError::Listing { .. }
        )
    }
}
