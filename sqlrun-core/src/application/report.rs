// sqlrun-core/src/application/report.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

use crate::domain::outcome::BatchVerdict;
use crate::error::SqlRunError;

/// Machine-readable summary of one run, written next to CI artifacts.
#[derive(Serialize)]
pub struct RunReport<'a> {
    pub started_at: DateTime<Utc>,
    pub engine: String,
    pub source: String,
    pub duration_ms: u64,
    pub overall_failed: bool,
    pub verdict: &'a BatchVerdict,
}

impl<'a> RunReport<'a> {
    pub fn new(
        started_at: DateTime<Utc>,
        engine: impl Into<String>,
        source: impl Into<String>,
        verdict: &'a BatchVerdict,
    ) -> Self {
        let duration_ms = (Utc::now() - started_at).num_milliseconds().max(0) as u64;
        Self {
            started_at,
            engine: engine.into(),
            source: source.into(),
            duration_ms,
            overall_failed: verdict.overall_failed(),
            verdict,
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SqlRunError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }
        save_json(path, self)
    }
}

fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), SqlRunError> {
    let content = serde_json::to_string_pretty(data)
        .map_err(|e| SqlRunError::InternalError(format!("Serialization: {}", e)))?;
    crate::infrastructure::fs::atomic_write(path, content)?;
    Ok(())
}
