use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PositionError {
    #[error("positions file not found: {0}")]
    NotFound(PathBuf),

    #[error("positions file io error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse positions file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode positions: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PositionError>;

/// Harvesting state persisted for one instance between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Name of the previous log file as of the last run; empty when the
    /// instance had only one log file.
    #[serde(default)]
    pub prev_logfile: String,
    /// Write time of the current log file, epoch milliseconds.
    #[serde(default)]
    pub last_written: i64,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub marker: String,
}

/// Instance identifier to position. Ordered so the file is stable on disk.
pub type Positions = BTreeMap<String, Position>;

/// Entry-by-entry equality over two position sets.
pub fn positions_equal(a: &Positions, b: &Positions) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().all(|(instance_id, left)| match b.get(instance_id) {
        Some(right) => {
            left.prev_logfile == right.prev_logfile
                && left.last_written == right.last_written
                && left.size == right.size
                && left.marker == right.marker
        }
        None => false,
    })
}

/// Reads and writes the positions file.
#[derive(Debug, Clone)]
pub struct PositionStore {
    path: PathBuf,
}

impl PositionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Positions> {
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                PositionError::NotFound(self.path.clone())
            } else {
                PositionError::Io {
                    path: self.path.clone(),
                    source: e,
                }
            }
        })?;

        serde_json::from_str(&contents).map_err(|e| PositionError::Parse {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Load positions, treating any failure as "no prior state".
    pub fn load_or_default(&self) -> Positions {
        match self.load() {
            Ok(positions) => {
                tracing::info!(
                    path = %self.path.display(),
                    instances = positions.len(),
                    "Loaded positions"
                );
                positions
            }
            Err(PositionError::NotFound(_)) => {
                tracing::info!(path = %self.path.display(), "No positions file found, starting fresh");
                Positions::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable positions file");
                Positions::new()
            }
        }
    }

    /// Write the full position set, replacing the file atomically.
    pub fn save(&self, positions: &Positions) -> Result<()> {
        let encoded = serde_json::to_string_pretty(positions)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, encoded).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), "Positions saved");
        Ok(())
    }

    /// Save only when `updated` differs from what was loaded. Returns whether
    /// the file was written.
    pub fn save_if_changed(&self, loaded: &Positions, updated: &Positions) -> Result<bool> {
        if positions_equal(loaded, updated) {
            tracing::info!("Positions unchanged, not rewriting positions file");
            return Ok(false);
        }
        self.save(updated)?;
        Ok(true)
    }

    fn io_error(&self, source: std::io::Error) -> PositionError {
        PositionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
