// sqlrun-core/src/domain/script.rs

use serde::Serialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// One `.sql` file, read fully into memory. Never mutated after loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Script {
    path: PathBuf,
    #[serde(skip)]
    content: String,
}

impl Script {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// File name without directories, used in reports.
    pub fn name(&self) -> Cow<'_, str> {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| self.path.to_string_lossy())
    }
}
