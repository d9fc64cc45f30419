// sqlrun-core/src/infrastructure/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::domain::settings::RunnerConfig;
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["sqlrun.yaml", "sqlrun.yml"];

/// Reads the runner configuration without validating it, so callers can layer
/// more settings on top before calling [`validate`].
///
/// An explicit path must exist. Without one, `sqlrun.yaml` then `sqlrun.yml`
/// are looked up in `dir`; when neither exists the defaults are used.
#[instrument(skip(explicit, dir))]
pub fn read_runner_config(
    explicit: Option<&Path>,
    dir: &Path,
) -> Result<RunnerConfig, InfrastructureError> {
    let path = match explicit {
        Some(path) if path.is_file() => Some(path.to_path_buf()),
        Some(path) => {
            return Err(InfrastructureError::ConfigNotFound(
                path.display().to_string(),
            ));
        }
        None => find_config(dir),
    };

    match path {
        Some(path) => {
            info!(path = ?path, "Loading runner configuration");
            let content = fs::read_to_string(&path)?;
            parse_runner_config(&content)
        }
        None => {
            debug!("No configuration file, using defaults");
            Ok(RunnerConfig::default())
        }
    }
}

fn find_config(dir: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

pub fn parse_runner_config(content: &str) -> Result<RunnerConfig, InfrastructureError> {
    // An empty file deserializes to unit, not to an empty mapping.
    if content.trim().is_empty() {
        return Ok(RunnerConfig::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

/// Checks the settings that must hold once every layer has been applied.
pub fn validate(config: &RunnerConfig) -> Result<(), InfrastructureError> {
    config
        .validate()
        .map_err(|e| InfrastructureError::ConfigError(e.to_string()))
}
