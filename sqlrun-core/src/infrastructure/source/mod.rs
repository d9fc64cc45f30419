// sqlrun-core/src/infrastructure/source/mod.rs

pub mod git;
pub mod local;

pub use git::GitRepository;
pub use local::LocalDirectory;

use crate::domain::settings::SourceSettings;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::source::ScriptSource;

/// A configured repository URL wins over the local directory.
pub fn from_settings(
    settings: &SourceSettings,
) -> Result<Box<dyn ScriptSource>, InfrastructureError> {
    match &settings.repository {
        Some(url) => Ok(Box::new(GitRepository::from_settings(url, settings))),
        None => Ok(Box::new(LocalDirectory::from_settings(settings)?)),
    }
}
