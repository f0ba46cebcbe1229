use super::enumerator::list_recent;
use super::paginator::fetch;
use super::reconciler::{plan, PlannedFetch};
use super::HarvestError;
use crate::config::{HarvestConfig, MissingLogsPolicy, OutputConfig};
use crate::marker::DEFAULT_MARKER;
use crate::pipeline::process_text;
use crate::position::{Position, Positions};
use crate::remote::LogService;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// A run stopped by a fatal instance error.
///
/// `positions` holds every position gathered before the failing instance, so
/// instances that already appended to their sinks can still be saved.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct RunAborted {
    pub positions: Positions,
    #[source]
    pub source: HarvestError,
}

/// Drives enumeration, planning, download and the event pipeline for each
/// instance in turn.
pub struct Harvester {
    service: Arc<dyn LogService>,
    harvest: HarvestConfig,
    output: OutputConfig,
}

impl Harvester {
    pub fn new(service: Arc<dyn LogService>, harvest: HarvestConfig, output: OutputConfig) -> Self {
        Self {
            service,
            harvest,
            output,
        }
    }

    /// Harvest every instance sequentially and return the updated positions.
    ///
    /// Instances not listed this run keep their loaded position.
    pub async fn run(
        &self,
        instances: &[String],
        loaded: &Positions,
    ) -> Result<Positions, RunAborted> {
        let mut updated = loaded.clone();

        for instance_id in instances {
            let stored = loaded.get(instance_id);
            match self.harvest_instance(instance_id, stored).await {
                Ok(position) => {
                    updated.insert(instance_id.clone(), position);
                }
                Err(e)
                    if e.is_missing_logs()
                        && self.harvest.on_missing_logs == MissingLogsPolicy::Skip =>
                {
                    warn!(instance_id = %instance_id, error = %e, "Skipping instance");
                }
                Err(e) => {
                    error!(instance_id = %instance_id, error = %e, "Aborting run");
                    return Err(RunAborted {
                        positions: updated,
                        source: e,
                    });
                }
            }
        }

        Ok(updated)
    }

    /// Harvest one instance and compute its new position.
    ///
    /// Download and sink failures are logged here and never advance the
    /// marker; only listing failures are returned.
    pub async fn harvest_instance(
        &self,
        instance_id: &str,
        stored: Option<&Position>,
    ) -> Result<Position, HarvestError> {
        let recent = list_recent(
            self.service.as_ref(),
            instance_id,
            &self.harvest.filename_contains,
        )
        .await?;

        let plan = plan(stored, &recent);
        if plan.rotated {
            info!(
                instance_id,
                previous = %plan.fetches[0].log_file,
                current = %recent.current.name,
                "Log rotation detected, draining previous file"
            );
        }

        let sink = self.output.sink_path(instance_id);
        let mut next_marker = None;

        for planned in &plan.fetches {
            match self.fetch_into_sink(instance_id, planned, &sink).await {
                Ok(marker) if planned.is_current => next_marker = marker,
                Ok(_) => {}
                Err(e) => {
                    warn!(instance_id, error = %e, "Fetch failed, keeping previous marker");
                }
            }
        }

        let marker = next_marker
            .or_else(|| {
                stored
                    .map(|p| p.marker.clone())
                    .filter(|marker| !marker.is_empty())
            })
            .unwrap_or_else(|| DEFAULT_MARKER.to_string());

        let position = Position {
            prev_logfile: plan.prev_logfile,
            last_written: recent.current.last_written,
            size: recent.current.size,
            marker,
        };

        info!(
            instance_id,
            log_file = %recent.current.name,
            marker = %position.marker,
            "Instance harvested"
        );

        Ok(position)
    }

    async fn fetch_into_sink(
        &self,
        instance_id: &str,
        planned: &PlannedFetch,
        sink: &Path,
    ) -> Result<Option<String>, HarvestError> {
        let outcome = fetch(
            self.service.as_ref(),
            instance_id,
            &planned.log_file,
            &planned.start_marker,
            self.harvest.max_pages,
        )
        .await
        .map_err(|source| HarvestError::Download {
            instance_id: instance_id.to_string(),
            log_file: planned.log_file.clone(),
            source,
        })?;

        process_text(outcome.text, sink).await?;
        Ok(outcome.next_marker)
    }
}
