use crate::config::{load_config, split_instance_ids, Config};
use crate::harvest::{HarvestError, Harvester};
use crate::position::{PositionError, PositionStore};
use crate::remote::{HttpLogService, RemoteError};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("remote client error: {0}")]
    Remote(#[from] RemoteError),

    #[error("harvest error: {0}")]
    Harvest(#[from] HarvestError),

    #[error("positions error: {0}")]
    Positions(#[from] PositionError),

    #[error("no instances to harvest; pass --instance-ids or list them under 'instances'")]
    NoInstances,
}

/// Command line overrides applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub instance_ids: Option<String>,
    pub positions: Option<PathBuf>,
    pub output: Option<String>,
    pub endpoint: Option<String>,
    pub token: Option<String>,
}

impl RunOverrides {
    pub fn apply(self, config: &mut Config) {
        if let Some(ids) = self.instance_ids {
            config.instances = split_instance_ids(&ids);
        }
        if let Some(path) = self.positions {
            config.positions.path = crate::config::expand_tilde(&path);
        }
        if let Some(output) = self.output {
            config.output.path = Some(output);
        }
        if let Some(endpoint) = self.endpoint {
            config.remote.endpoint = endpoint;
        }
        if let Some(token) = self.token {
            config.remote.token = Some(token);
        }
    }
}

pub async fn run(
    config_path: Option<PathBuf>,
    overrides: RunOverrides,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(config_path, overrides)?;
    let service = Arc::new(HttpLogService::new(&config.remote).map_err(RunError::from)?);
    run_harvest(&config, service).await.map_err(|e| e.into())
}

fn build_config(config_path: Option<PathBuf>, overrides: RunOverrides) -> Result<Config, RunError> {
    let mut config = match config_path {
        Some(path) => {
            info!(config_path = %path.display(), "Loading configuration");
            load_config(&path)?
        }
        None => {
            info!("No config file found, using defaults and command line flags");
            Config::default()
        }
    };

    overrides.apply(&mut config);
    crate::config::parse::validate_config(&config)?;

    if config.instances.is_empty() {
        return Err(RunError::NoInstances);
    }

    Ok(config)
}

/// Load positions, harvest every configured instance and persist the result
/// if anything changed.
pub async fn run_harvest(
    config: &Config,
    service: Arc<dyn crate::remote::LogService>,
) -> Result<(), RunError> {
    let store = PositionStore::new(&config.positions.path);
    let loaded = store.load_or_default();

    let harvester = Harvester::new(service, config.harvest.clone(), config.output.clone());

    info!(instances = config.instances.len(), "Starting harvest");
    let updated = match harvester.run(&config.instances, &loaded).await {
        Ok(updated) => updated,
        Err(aborted) => {
            // instances finished before the failure have already written their events
            if store.save_if_changed(&loaded, &aborted.positions)? {
                info!(path = %store.path().display(), "Positions saved before abort");
            }
            return Err(aborted.source.into());
        }
    };

    if store.save_if_changed(&loaded, &updated)? {
        info!(path = %store.path().display(), "Positions updated");
    } else if updated.is_empty() {
        warn!("No positions recorded");
    }

    info!("Harvest complete");
    Ok(())
}
