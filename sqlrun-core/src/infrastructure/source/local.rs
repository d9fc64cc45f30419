// sqlrun-core/src/infrastructure/source/local.rs

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::domain::script::Script;
use crate::domain::settings::{ScriptOrder, SourceSettings};
use crate::error::SqlRunError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::source::ScriptSource;

const SCRIPT_EXTENSION: &str = "sql";

/// Scripts sitting directly in one directory (no recursion).
#[derive(Debug, Clone)]
pub struct LocalDirectory {
    dir: PathBuf,
    order: ScriptOrder,
    select: Option<Regex>,
}

impl LocalDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            order: ScriptOrder::default(),
            select: None,
        }
    }

    pub fn from_settings(settings: &SourceSettings) -> Result<Self, InfrastructureError> {
        Self::new(&settings.dir)
            .with_order(settings.order)
            .with_select(settings.select.as_deref())
    }

    pub fn with_order(mut self, order: ScriptOrder) -> Self {
        self.order = order;
        self
    }

    /// Keeps only scripts whose file name matches `pattern`.
    pub fn with_select(mut self, pattern: Option<&str>) -> Result<Self, InfrastructureError> {
        self.select = pattern.map(Regex::new).transpose()?;
        Ok(self)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[instrument(skip(self), fields(dir = %self.dir.display(), order = ?self.order))]
    pub(crate) fn scan(&self) -> Result<Vec<Script>, InfrastructureError> {
        if !self.dir.is_dir() {
            return Err(InfrastructureError::Source(format!(
                "{} is not a readable directory",
                self.dir.display()
            )));
        }

        let mut walker = WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true);
        if self.order == ScriptOrder::Lexical {
            walker = walker.sort_by_file_name();
        }

        let mut scripts = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                InfrastructureError::Source(format!("cannot list {}: {}", self.dir.display(), e))
            })?;

            let path = entry.path();
            if !entry.file_type().is_file() || !is_script(path) {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            if let Some(select) = &self.select
                && !select.is_match(&file_name)
            {
                debug!(script = %file_name, "Skipped by selection pattern");
                continue;
            }

            let content = fs::read_to_string(path).map_err(|e| {
                InfrastructureError::Source(format!("cannot read {}: {}", path.display(), e))
            })?;
            scripts.push(Script::new(path, content));
        }

        let names: Vec<_> = scripts.iter().map(|s| s.name().into_owned()).collect();
        info!("📜 Scripts to run: {:?}", names);
        Ok(scripts)
    }
}

/// `.sql` in any letter case; `.SQL` and `.Sql` count too.
fn is_script(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SCRIPT_EXTENSION))
}

impl ScriptSource for LocalDirectory {
    fn load(&self) -> Result<Vec<Script>, SqlRunError> {
        Ok(self.scan()?)
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) -> Result<()> {
        fs::write(dir.join(name), content)?;
        Ok(())
    }

    fn names(scripts: &[Script]) -> Vec<String> {
        scripts.iter().map(|s| s.name().into_owned()).collect()
    }

    #[test]
    fn test_extension_match_is_case_insensitive() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write(dir.path(), "01_create.sql", "CREATE TABLE t(x int);")?;
        write(dir.path(), "02_upper.SQL", "SELECT 1;")?;
        write(dir.path(), "03_mixed.Sql", "SELECT 2;")?;
        write(dir.path(), "notes.txt", "not a script")?;
        write(dir.path(), "sql", "no extension")?;

        let scripts = LocalDirectory::new(dir.path()).load()?;

        assert_eq!(names(&scripts), ["01_create.sql", "02_upper.SQL", "03_mixed.Sql"]);
        assert_eq!(scripts[0].content(), "CREATE TABLE t(x int);");
        Ok(())
    }

    #[test]
    fn test_subdirectories_are_not_scanned() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write(dir.path(), "top.sql", "SELECT 1;")?;
        fs::create_dir(dir.path().join("nested.sql"))?;
        fs::create_dir(dir.path().join("archive"))?;
        write(&dir.path().join("archive"), "old.sql", "SELECT 0;")?;

        let scripts = LocalDirectory::new(dir.path()).load()?;

        assert_eq!(names(&scripts), ["top.sql"]);
        Ok(())
    }

    #[test]
    fn test_lexical_order_by_file_name() -> Result<()> {
        let dir = tempfile::tempdir()?;
        for name in ["10_c.sql", "02_b.sql", "01_a.sql"] {
            write(dir.path(), name, "SELECT 1;")?;
        }

        let scripts = LocalDirectory::new(dir.path())
            .with_order(ScriptOrder::Lexical)
            .load()?;

        assert_eq!(names(&scripts), ["01_a.sql", "02_b.sql", "10_c.sql"]);
        Ok(())
    }

    #[test]
    fn test_listing_order_returns_every_script() -> Result<()> {
        let dir = tempfile::tempdir()?;
        for name in ["b.sql", "a.sql", "c.sql"] {
            write(dir.path(), name, "SELECT 1;")?;
        }

        let mut found = names(
            &LocalDirectory::new(dir.path())
                .with_order(ScriptOrder::Listing)
                .load()?,
        );
        found.sort();

        assert_eq!(found, ["a.sql", "b.sql", "c.sql"]);
        Ok(())
    }

    #[test]
    fn test_select_pattern_filters_file_names() -> Result<()> {
        let dir = tempfile::tempdir()?;
        for name in ["01_schema.sql", "02_seed.sql", "03_schema_extra.sql"] {
            write(dir.path(), name, "SELECT 1;")?;
        }

        let scripts = LocalDirectory::new(dir.path())
            .with_select(Some("schema"))?
            .load()?;

        assert_eq!(names(&scripts), ["01_schema.sql", "03_schema_extra.sql"]);
        Ok(())
    }

    #[test]
    fn test_invalid_select_pattern_is_rejected() {
        let result = LocalDirectory::new(".").with_select(Some("(unclosed"));
        assert!(matches!(result, Err(InfrastructureError::InvalidPattern(_))));
    }

    #[test]
    fn test_missing_directory_is_a_source_error() {
        let err = LocalDirectory::new("/definitely/not/here").scan().unwrap_err();
        assert!(matches!(err, InfrastructureError::Source(_)));
    }

    #[test]
    fn test_empty_directory_yields_no_scripts() -> Result<()> {
        let dir = tempfile::tempdir()?;
        assert!(LocalDirectory::new(dir.path()).load()?.is_empty());
        Ok(())
    }
}
