// sqlrun-core/src/ports/source.rs

use crate::domain::script::Script;
use crate::error::SqlRunError;

/// Produces the ordered list of scripts for one batch.
///
/// The order returned is the execution order; the orchestrator never sorts.
pub trait ScriptSource: Send + Sync {
    fn load(&self) -> Result<Vec<Script>, SqlRunError>;

    /// Human readable origin (directory, repository URL) for logs.
    fn describe(&self) -> String;
}
