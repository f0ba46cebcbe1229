use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("log service returned error status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("pagination exceeded {0} pages")]
    PageLimit(usize),

    #[error("page reported more data pending but carried no marker")]
    MissingMarker,

    #[error("log service error: {0}")]
    Generic(String),
}

/// A remote log file as reported by the listing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFileDescriptor {
    #[serde(rename = "log_file_name")]
    pub name: String,
    /// Epoch milliseconds.
    pub last_written: i64,
    pub size: i64,
}

/// One page of a paginated log download.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogPortion {
    #[serde(default, rename = "log_file_data")]
    pub data: Option<String>,
    #[serde(default)]
    pub marker: Option<String>,
    #[serde(default)]
    pub additional_data_pending: bool,
}

/// The remote service hosting database log files.
#[async_trait]
pub trait LogService: Send + Sync {
    async fn describe_log_files(
        &self,
        instance_id: &str,
        filename_contains: &str,
    ) -> Result<Vec<LogFileDescriptor>, RemoteError>;

    async fn download_portion(
        &self,
        instance_id: &str,
        log_file_name: &str,
        marker: &str,
    ) -> Result<LogPortion, RemoteError>;
}
