use crate::marker::next_marker_from;
use crate::remote::{LogService, RemoteError};
use tracing::{debug, warn};

/// Text downloaded from one log file and where to resume next run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOutcome {
    pub text: String,
    /// `None` when the final page had no usable marker.
    pub next_marker: Option<String>,
    pub pages: usize,
}

/// Download `log_file` from `start_marker` to the end of the available data.
///
/// Each page is requested with the marker the previous page returned. The
/// resume marker comes from the final page only; a malformed one is logged
/// and dropped so the caller keeps its stored marker. A page that reports more
/// data pending without a marker to continue from fails the whole fetch.
pub async fn fetch(
    service: &dyn LogService,
    instance_id: &str,
    log_file: &str,
    start_marker: &str,
    max_pages: usize,
) -> Result<FetchOutcome, RemoteError> {
    let mut outcome = FetchOutcome::default();
    let mut marker = start_marker.to_string();

    loop {
        if outcome.pages >= max_pages {
            return Err(RemoteError::PageLimit(max_pages));
        }

        let portion = service
            .download_portion(instance_id, log_file, &marker)
            .await?;
        outcome.pages += 1;

        if let Some(data) = &portion.data {
            outcome.text.push_str(data);
        }

        if portion.additional_data_pending {
            marker = portion.marker.ok_or(RemoteError::MissingMarker)?;
            continue;
        }

        outcome.next_marker = match portion.marker.as_deref() {
            Some(raw) => match next_marker_from(raw) {
                Ok(next) => Some(next),
                Err(e) => {
                    warn!(instance_id, log_file, error = %e, "Discarding final marker");
                    None
                }
            },
            None => None,
        };
        break;
    }

    debug!(
        instance_id,
        log_file,
        start_marker,
        pages = outcome.pages,
        bytes = outcome.text.len(),
        next_marker = ?outcome.next_marker,
        "Fetched log file"
    );

    Ok(outcome)
}
