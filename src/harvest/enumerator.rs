use super::HarvestError;
use crate::remote::{LogFileDescriptor, LogService};
use chrono::DateTime;
use tracing::debug;

/// The two newest log files of an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentLogFiles {
    pub current: LogFileDescriptor,
    pub previous: Option<LogFileDescriptor>,
}

impl RecentLogFiles {
    /// Name recorded as `prev_logfile`; empty when there is a single file.
    pub fn previous_name(&self) -> &str {
        self.previous.as_ref().map(|f| f.name.as_str()).unwrap_or("")
    }
}

/// Order descriptors newest first and keep at most two.
pub fn rank_recent(
    instance_id: &str,
    mut files: Vec<LogFileDescriptor>,
) -> Result<RecentLogFiles, HarvestError> {
    files.sort_by(|a, b| b.last_written.cmp(&a.last_written));
    files.truncate(2);

    let mut ranked = files.into_iter();
    let current = ranked.next().ok_or_else(|| HarvestError::NoLogFilesFound {
        instance_id: instance_id.to_string(),
    })?;

    Ok(RecentLogFiles {
        current,
        previous: ranked.next(),
    })
}

/// List an instance's log files matching `filename_contains` and rank them.
pub async fn list_recent(
    service: &dyn LogService,
    instance_id: &str,
    filename_contains: &str,
) -> Result<RecentLogFiles, HarvestError> {
    let files = service
        .describe_log_files(instance_id, filename_contains)
        .await
        .map_err(|source| HarvestError::Listing {
            instance_id: instance_id.to_string(),
            source,
        })?;

    let listed = files.len();
    let recent = rank_recent(instance_id, files)?;

    debug!(
        instance_id,
        listed,
        current = %recent.current.name,
        current_written = ?DateTime::from_timestamp_millis(recent.current.last_written),
        previous = recent.previous_name(),
        "Ranked log files"
    );

    Ok(recent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, last_written: i64) -> LogFileDescriptor {
        LogFileDescriptor {
            name: name.to_string(),
            last_written,
            size: 100,
        }
    }

    #[test]
    fn test_rank_recent_orders_by_write_time() {
        let recent = rank_recent(
            "db-1",
            vec![
                file("slowquery.log.1", 100),
                file("slowquery.log", 300),
                file("slowquery.log.0", 200),
            ],
        )
        .unwrap();

        assert_eq!(recent.current.name, "slowquery.log");
        assert_eq!(recent.previous_name(), "slowquery.log.0");
    }

    #[test]
    fn test_rank_recent_single_file() {
        let recent = rank_recent("db-1", vec![file("slowquery.log", 1)]).unwrap();
        assert!(recent.previous.is_none());
        assert_eq!(recent.previous_name(), "");
    }

    #[test]
    fn test_rank_recent_empty_is_error() {
        let err = rank_recent("db-1", vec![]).unwrap_err();
        assert!(matches!(err, HarvestError::NoLogFilesFound { ref instance_id } if instance_id == "db-1"));
    }
}
