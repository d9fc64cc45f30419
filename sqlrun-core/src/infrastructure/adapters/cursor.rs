// sqlrun-core/src/infrastructure/adapters/cursor.rs

use std::collections::VecDeque;

use crate::domain::error::DomainError;
use crate::error::SqlRunError;
use crate::ports::connector::{ColumnMeta, RawRow, ResultCursor};

/// A row still in the driver's own representation.
///
/// Decoding happens when the cursor hands the row out, so a value the adapter
/// cannot render fails the read, not the execution.
pub trait DecodeRow: Send {
    fn decode(self) -> Result<RawRow, SqlRunError>;
}

impl DecodeRow for RawRow {
    fn decode(self) -> Result<RawRow, SqlRunError> {
        Ok(self)
    }
}

/// A result set fully read off the wire.
#[derive(Debug, Clone)]
pub struct BufferedSet<R> {
    pub columns: Vec<ColumnMeta>,
    pub rows: VecDeque<R>,
}

impl<R> BufferedSet<R> {
    pub fn new(columns: Vec<ColumnMeta>) -> Self {
        Self {
            columns,
            rows: VecDeque::new(),
        }
    }
}

/// Cursor over result sets the adapter already collected.
///
/// Both drivers hand results back only once the statement finished, so the
/// adapters buffer them and replay them through the cursor contract.
#[derive(Debug)]
pub struct BufferedCursor<R> {
    pending: VecDeque<BufferedSet<R>>,
    current: Option<BufferedSet<R>>,
}

impl<R> BufferedCursor<R> {
    pub fn new(sets: Vec<BufferedSet<R>>) -> Self {
        Self {
            pending: sets.into(),
            current: None,
        }
    }

    fn current(&self) -> Result<&BufferedSet<R>, SqlRunError> {
        self.current.as_ref().ok_or_else(no_current_set)
    }
}

fn no_current_set() -> SqlRunError {
    DomainError::CursorState("no current result set".to_string()).into()
}

impl<R: DecodeRow> ResultCursor for BufferedCursor<R> {
    fn next_result_set(&mut self) -> Result<bool, SqlRunError> {
        self.current = self.pending.pop_front();
        Ok(self.current.is_some())
    }

    fn columns(&self) -> Result<Vec<ColumnMeta>, SqlRunError> {
        Ok(self.current()?.columns.clone())
    }

    fn next_row(&mut self) -> Result<Option<RawRow>, SqlRunError> {
        let set = self.current.as_mut().ok_or_else(no_current_set)?;
        set.rows.pop_front().map(DecodeRow::decode).transpose()
    }
}
