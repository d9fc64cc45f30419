// sqlrun-core/src/application/materialization.rs

use tracing::{debug, instrument};

use crate::domain::result::{Cell, ResultSet};
use crate::error::SqlRunError;
use crate::ports::connector::ResultCursor;

pub struct Materializer;

impl Materializer {
    /// Reads every result set the cursor holds, in order, into memory.
    ///
    /// A script without row-returning statements yields an empty vector. The
    /// first metadata or scan error aborts the whole drain; sets already read
    /// are dropped with it.
    #[instrument(skip(cursor))]
    pub fn drain(cursor: &mut dyn ResultCursor) -> Result<Vec<ResultSet>, SqlRunError> {
        let mut result_sets = Vec::new();

        while cursor.next_result_set()? {
            let set = Self::drain_current(cursor)?;
            debug!(
                index = result_sets.len(),
                columns = set.width(),
                rows = set.rows().len(),
                "Result set materialized"
            );
            result_sets.push(set);
        }

        Ok(result_sets)
    }

    fn drain_current(cursor: &mut dyn ResultCursor) -> Result<ResultSet, SqlRunError> {
        // Shape is fixed for the lifetime of the set: read it once, before any row.
        let (names, type_names): (Vec<String>, Vec<String>) = cursor
            .columns()?
            .into_iter()
            .map(|c| (c.name, c.type_name))
            .unzip();

        let mut set = ResultSet::new(names, type_names);

        while let Some(raw) = cursor.next_row()? {
            let row = raw.into_iter().map(Cell::from_raw).collect();
            set.push_row(row)?;
        }

        Ok(set)
    }
}
