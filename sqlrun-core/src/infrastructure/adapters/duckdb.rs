// sqlrun-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::arrow::array::{Array, ArrayRef};
use duckdb::arrow::datatypes::DataType;
use duckdb::arrow::record_batch::RecordBatch;
use duckdb::arrow::util::display::array_value_to_string;
use duckdb::{Config, Connection};
use sqlparser::dialect::DuckDbDialect;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, instrument};

use super::cursor::{BufferedCursor, BufferedSet, DecodeRow};
use super::statements::split_statements;
use crate::error::SqlRunError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::connector::{ColumnMeta, Connector, RawRow, ResultCursor};

pub const IN_MEMORY: &str = ":memory:";

/// Embedded DuckDB database, in memory or backed by a file.
///
/// The binding runs one statement per call, so scripts are split on
/// top-level semicolons and every row-returning statement becomes one
/// result set, including those with zero rows.
pub struct DuckDBConnector {
    conn: Arc<Mutex<Option<Connection>>>,
}

impl DuckDBConnector {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == IN_MEMORY {
            Connection::open_in_memory_with_flags(config)
        } else {
            Connection::open_with_flags(db_path, config)
        }
        .map_err(|e| InfrastructureError::Connection {
            target: format!("duckdb:{}", db_path),
            reason: e.to_string(),
        })?;

        Ok(Self {
            conn: Arc::new(Mutex::new(Some(conn))),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Connection>>, SqlRunError> {
        self.conn.lock().map_err(|_| {
            SqlRunError::Infrastructure(InfrastructureError::Io(std::io::Error::other(
                "DuckDB Mutex Poisoned",
            )))
        })
    }
}

#[async_trait]
impl Connector for DuckDBConnector {
    #[instrument(skip_all)]
    async fn execute(&self, script: &str) -> Result<Box<dyn ResultCursor>, SqlRunError> {
        let guard = self.lock()?;
        let conn = guard.as_ref().ok_or(DatabaseError::Closed)?;

        let mut sets = Vec::new();
        for statement in split_statements(&DuckDbDialect {}, script) {
            debug!(sql = %statement.sql.trim(), rows = statement.returns_rows, "DuckDB statement");
            if statement.returns_rows {
                if let Some(set) = query_set(conn, &statement.sql)? {
                    sets.push(set);
                }
            } else {
                conn.execute_batch(&statement.sql)?;
            }
        }

        Ok(Box::new(BufferedCursor::new(sets)))
    }

    async fn ping(&self) -> Result<(), SqlRunError> {
        let guard = self.lock()?;
        let conn = guard.as_ref().ok_or(DatabaseError::Closed)?;
        conn.execute_batch("SELECT 1")?;
        Ok(())
    }

    async fn close(&self) -> Result<(), SqlRunError> {
        let mut guard = self.lock()?;
        if let Some(conn) = guard.take() {
            conn.close().map_err(|(_, e)| SqlRunError::from(e))?;
        }
        Ok(())
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

/// One row of an Arrow batch, rendered to text only when read.
pub struct ArrowRow {
    batch: RecordBatch,
    index: usize,
}

impl DecodeRow for ArrowRow {
    fn decode(self) -> Result<RawRow, SqlRunError> {
        self.batch
            .columns()
            .iter()
            .map(|column| render_cell(column, self.index))
            .collect()
    }
}

fn query_set(
    conn: &Connection,
    sql: &str,
) -> Result<Option<BufferedSet<ArrowRow>>, InfrastructureError> {
    let mut stmt = conn.prepare(sql)?;
    let arrow = stmt.query_arrow([])?;
    let schema = arrow.get_schema();

    // Statements with no projection (e.g. some PRAGMAs) yield no result set.
    if schema.fields().is_empty() {
        return Ok(None);
    }

    let columns = schema
        .fields()
        .iter()
        .map(|field| ColumnMeta::new(field.name(), field.data_type().to_string()))
        .collect();
    let mut set = BufferedSet::new(columns);

    for batch in arrow {
        for index in 0..batch.num_rows() {
            set.rows.push_back(ArrowRow {
                batch: batch.clone(),
                index,
            });
        }
    }

    Ok(Some(set))
}

fn render_cell(column: &ArrayRef, row: usize) -> Result<Option<Vec<u8>>, SqlRunError> {
    if matches!(column.data_type(), DataType::Null) || column.is_null(row) {
        return Ok(None);
    }
    array_value_to_string(column, row)
        .map(|text| Some(text.into_bytes()))
        .map_err(|e| DatabaseError::Decode(e.to_string()).into())
}
