// sqlrun-core/src/infrastructure/source/git.rs

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, instrument};

use super::local::LocalDirectory;
use crate::domain::script::Script;
use crate::domain::settings::{ScriptOrder, SourceSettings};
use crate::error::SqlRunError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::source::ScriptSource;

/// Scripts read from a shallow clone of a git repository.
///
/// The clone lives in a temporary directory that is removed once the scripts
/// are in memory. Script paths are reported relative to the repository root.
#[derive(Debug, Clone)]
pub struct GitRepository {
    url: String,
    branch: Option<String>,
    subdir: PathBuf,
    order: ScriptOrder,
    select: Option<String>,
}

impl GitRepository {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            branch: None,
            subdir: PathBuf::from("scripts"),
            order: ScriptOrder::default(),
            select: None,
        }
    }

    pub fn from_settings(url: &str, settings: &SourceSettings) -> Self {
        Self::new(url)
            .with_branch(settings.branch.clone())
            .with_subdir(&settings.subdir)
            .with_order(settings.order)
            .with_select(settings.select.clone())
    }

    pub fn with_branch(mut self, branch: Option<String>) -> Self {
        self.branch = branch;
        self
    }

    pub fn with_subdir(mut self, subdir: impl Into<PathBuf>) -> Self {
        self.subdir = subdir.into();
        self
    }

    pub fn with_order(mut self, order: ScriptOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_select(mut self, select: Option<String>) -> Self {
        self.select = select;
        self
    }

    fn clone_into(&self, dest: &Path) -> Result<(), InfrastructureError> {
        let mut cmd = Command::new("git");
        cmd.arg("clone").arg("--quiet").arg("--depth").arg("1");
        if let Some(branch) = &self.branch {
            cmd.arg("--branch").arg(branch);
        }
        cmd.arg(&self.url).arg(dest);
        // Never block on a credentials prompt.
        cmd.env("GIT_TERMINAL_PROMPT", "0");

        let output = cmd
            .output()
            .map_err(|e| InfrastructureError::Source(format!("failed to execute git: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InfrastructureError::Source(format!(
                "failed to clone {}: {}",
                self.url,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

impl ScriptSource for GitRepository {
    #[instrument(skip(self), fields(url = %self.url, branch = ?self.branch))]
    fn load(&self) -> Result<Vec<Script>, SqlRunError> {
        let workspace = tempfile::tempdir().map_err(InfrastructureError::Io)?;
        let checkout = workspace.path().join("checkout");

        info!("📥 Cloning {} ...", self.url);
        self.clone_into(&checkout)?;

        let scripts = LocalDirectory::new(checkout.join(&self.subdir))
            .with_order(self.order)
            .with_select(self.select.as_deref())?
            .scan()?;

        Ok(scripts
            .into_iter()
            .map(|script| {
                let relative = script
                    .path()
                    .strip_prefix(&checkout)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| script.path().to_path_buf());
                Script::new(relative, script.content())
            })
            .collect())
    }

    fn describe(&self) -> String {
        match &self.branch {
            Some(branch) => format!("{}@{} ({})", self.url, branch, self.subdir.display()),
            None => format!("{} ({})", self.url, self.subdir.display()),
        }
    }
}
