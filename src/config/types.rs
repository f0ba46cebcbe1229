use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_POSITIONS_FILE: &str = "rds-slowlog-downloader.conf";
pub const INSTANCE_PLACEHOLDER: &str = "{instance}";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub instances: Vec<String>,
    #[serde(default)]
    pub harvest: HarvestConfig,
    #[serde(default)]
    pub positions: PositionsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token: None,
            timeout: default_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "http://127.0.0.1:7300".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    #[serde(default = "default_filename_contains")]
    pub filename_contains: String,
    #[serde(default)]
    pub on_missing_logs: MissingLogsPolicy,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            filename_contains: default_filename_contains(),
            on_missing_logs: MissingLogsPolicy::default(),
            max_pages: default_max_pages(),
        }
    }
}

fn default_filename_contains() -> String {
    "slowquery".to_string()
}

fn default_max_pages() -> usize {
    10_000
}

/// What to do when an instance has no log files matching the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingLogsPolicy {
    /// Stop the whole run.
    #[default]
    Abort,
    /// Log it and carry the instance's stored position forward.
    Skip,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionsConfig {
    #[serde(default = "default_positions_path")]
    pub path: PathBuf,
}

impl Default for PositionsConfig {
    fn default() -> Self {
        Self {
            path: default_positions_path(),
        }
    }
}

fn default_positions_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_POSITIONS_FILE)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Slow log destination. `{instance}` is replaced by the instance id;
    /// without it every instance appends to the same file.
    #[serde(default)]
    pub path: Option<String>,
}

impl OutputConfig {
    pub fn sink_path(&self, instance_id: &str) -> PathBuf {
        match &self.path {
            Some(template) => PathBuf::from(template.replace(INSTANCE_PLACEHOLDER, instance_id)),
            None => std::env::temp_dir().join(format!("{}.slowquery.log", instance_id)),
        }
    }
}
