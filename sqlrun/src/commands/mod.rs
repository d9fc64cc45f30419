// sqlrun/src/commands/mod.rs

pub mod query;
pub mod run;
pub mod validate;

use anyhow::Context;
use std::path::Path;

use sqlrun_core::domain::settings::RunnerConfig;
use sqlrun_core::infrastructure::config::{read_runner_config, validate};

/// Config file (or defaults), then command-line overrides, then validation.
pub fn resolve_config(
    explicit: Option<&Path>,
    overrides: impl FnOnce(&mut RunnerConfig),
) -> anyhow::Result<RunnerConfig> {
    let mut config = read_runner_config(explicit, Path::new("."))
        .context("Failed to load runner configuration")?;
    overrides(&mut config);
    validate(&config).context("Invalid runner configuration")?;
    Ok(config)
}
