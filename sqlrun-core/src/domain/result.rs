// sqlrun-core/src/domain/result.rs
//
// Language-neutral rendering of whatever a statement returned: every value is
// kept as the bytes the driver produced, NULL is its own variant.

use serde::{Serialize, Serializer};
use std::borrow::Cow;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    Null,
    Value(Vec<u8>),
}

impl Cell {
    /// Maps a raw driver value: absent means SQL NULL, anything else (even
    /// zero bytes) is a value.
    pub fn from_raw(raw: Option<Vec<u8>>) -> Self {
        match raw {
            Some(bytes) => Cell::Value(bytes),
            None => Cell::Null,
        }
    }

    pub fn text(value: &str) -> Self {
        Cell::Value(value.as_bytes().to_vec())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Cell::Null => None,
            Cell::Value(bytes) => Some(bytes),
        }
    }

    /// Lossy UTF-8 view of the value, `None` for NULL.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        self.as_bytes().map(String::from_utf8_lossy)
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_text() {
            Some(text) => serializer.serialize_str(&text),
            None => serializer.serialize_none(),
        }
    }
}

pub type Row = Vec<Cell>;

/// Tabular output of one row-returning statement.
///
/// Every row has exactly one cell per column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSet {
    column_names: Vec<String>,
    column_type_names: Vec<String>,
    rows: Vec<Row>,
}

impl ResultSet {
    pub fn new(column_names: Vec<String>, column_type_names: Vec<String>) -> Self {
        Self {
            column_names,
            column_type_names,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Row) -> Result<(), DomainError> {
        if row.len() != self.column_names.len() {
            return Err(DomainError::RowShape {
                expected: self.column_names.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn column_type_names(&self) -> &[String] {
        &self.column_type_names
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.column_names.len()
    }
}
