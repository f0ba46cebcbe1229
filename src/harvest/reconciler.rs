use super::enumerator::RecentLogFiles;
use crate::marker::{resume_marker, DEFAULT_MARKER};
use crate::position::Position;

/// One paginated download to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFetch {
    pub log_file: String,
    pub start_marker: String,
    /// Fetches of the file the instance is writing to now. Only these advance
    /// the stored marker.
    pub is_current: bool,
}

/// What to download for an instance this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub fetches: Vec<PlannedFetch>,
    /// `prev_logfile` to record for the next run.
    pub prev_logfile: String,
    pub rotated: bool,
}

/// Decide the fetches for an instance from its stored position and the files
/// observed now.
///
/// A changed previous file name is the only visible sign that the file being
/// tracked has rotated out of the current slot. When that happens the stored
/// previous file is drained from the stored marker first, then the new current
/// file is read from the beginning.
pub fn plan(stored: Option<&Position>, recent: &RecentLogFiles) -> FetchPlan {
    let observed_previous = recent.previous_name();
    let current = recent.current.name.clone();

    let (fetches, rotated) = match stored {
        None => (
            vec![PlannedFetch {
                log_file: current,
                start_marker: DEFAULT_MARKER.to_string(),
                is_current: true,
            }],
            false,
        ),
        Some(position)
            if !position.prev_logfile.is_empty()
                && position.prev_logfile != observed_previous =>
        {
            (
                vec![
                    PlannedFetch {
                        log_file: position.prev_logfile.clone(),
                        start_marker: resume_marker(&position.marker),
                        is_current: false,
                    },
                    PlannedFetch {
                        log_file: current,
                        start_marker: DEFAULT_MARKER.to_string(),
                        is_current: true,
                    },
                ],
                true,
            )
        }
        Some(position) => (
            vec![PlannedFetch {
                log_file: current,
                start_marker: resume_marker(&position.marker),
                is_current: true,
            }],
            false,
        ),
    };

    FetchPlan {
        fetches,
        prev_logfile: observed_previous.to_string(),
        rotated,
    }
}
