// sqlrun-core/src/ports/connector.rs

// What the runner needs from a database, without knowing which one it is.
// A Connector accepts the raw text of one script; the ResultCursor hands back
// whatever the driver produced, one result set at a time.

use crate::error::SqlRunError;
use async_trait::async_trait;

/// Column metadata, read once per result set before any row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    pub type_name: String,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// One row as the driver reports it: `None` is SQL NULL, `Some(bytes)` is the
/// textual rendering of the value (possibly empty).
pub type RawRow = Vec<Option<Vec<u8>>>;

/// Driver-level cursor over the results of one script.
///
/// The cursor starts positioned *before* the first result set. Callers loop on
/// `next_result_set`, read `columns` once, then call `next_row` until it
/// returns `None`.
pub trait ResultCursor: Send {
    /// Moves to the next result set. Returns `false` once none remain.
    fn next_result_set(&mut self) -> Result<bool, SqlRunError>;

    /// Column metadata of the current result set.
    fn columns(&self) -> Result<Vec<ColumnMeta>, SqlRunError>;

    /// Next row of the current result set, `None` when the set is exhausted.
    fn next_row(&mut self) -> Result<Option<RawRow>, SqlRunError>;
}

#[async_trait]
pub trait Connector: Send + Sync {
    /// Sends the full script text as a single request. Statement boundaries are
    /// the engine's business.
    async fn execute(&self, script: &str) -> Result<Box<dyn ResultCursor>, SqlRunError>;

    /// Round trip used during setup to fail fast on a dead connection.
    async fn ping(&self) -> Result<(), SqlRunError>;

    /// Releases the connection. Later calls to `execute` fail.
    async fn close(&self) -> Result<(), SqlRunError>;

    fn engine_name(&self) -> &str;
}
