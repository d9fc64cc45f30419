// sqlrun-core/src/application/testing.rs
//
// In-memory Connector / ResultCursor doubles shared by the application tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::error::DomainError;
use crate::error::SqlRunError;
use crate::infrastructure::error::DatabaseError;
use crate::ports::connector::{ColumnMeta, Connector, RawRow, ResultCursor};

/// One scripted result set. A row given as `Err` makes `next_row` fail.
#[derive(Clone)]
pub struct MockSet {
    pub columns: Vec<ColumnMeta>,
    pub rows: Vec<Result<RawRow, String>>,
}

impl MockSet {
    pub fn new(columns: &[(&str, &str)], rows: Vec<RawRow>) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|(name, ty)| ColumnMeta::new(*name, *ty))
                .collect(),
            rows: rows.into_iter().map(Ok).collect(),
        }
    }

    pub fn failing_after(mut self, message: &str) -> Self {
        self.rows.push(Err(message.to_string()));
        self
    }
}

pub fn row(values: &[Option<&str>]) -> RawRow {
    values
        .iter()
        .map(|v| v.map(|s| s.as_bytes().to_vec()))
        .collect()
}

pub struct MockCursor {
    pending: VecDeque<MockSet>,
    current: Option<(Vec<ColumnMeta>, VecDeque<Result<RawRow, String>>)>,
    columns_error: Option<String>,
}

impl MockCursor {
    pub fn new(sets: Vec<MockSet>) -> Self {
        Self {
            pending: sets.into(),
            current: None,
            columns_error: None,
        }
    }

    pub fn with_columns_error(mut self, message: &str) -> Self {
        self.columns_error = Some(message.to_string());
        self
    }
}

impl ResultCursor for MockCursor {
    fn next_result_set(&mut self) -> Result<bool, SqlRunError> {
        self.current = self
            .pending
            .pop_front()
            .map(|set| (set.columns, set.rows.into()));
        Ok(self.current.is_some())
    }

    fn columns(&self) -> Result<Vec<ColumnMeta>, SqlRunError> {
        if let Some(message) = &self.columns_error {
            return Err(DatabaseError::Decode(message.clone()).into());
        }
        self.current
            .as_ref()
            .map(|(columns, _)| columns.clone())
            .ok_or_else(|| DomainError::CursorState("no current result set".into()).into())
    }

    fn next_row(&mut self) -> Result<Option<RawRow>, SqlRunError> {
        let (_, rows) = self
            .current
            .as_mut()
            .ok_or_else(|| DomainError::CursorState("no current result set".into()))?;
        match rows.pop_front() {
            None => Ok(None),
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(message)) => Err(DatabaseError::Decode(message).into()),
        }
    }
}

/// Scripted database. Scripts not registered succeed with no result set.
#[derive(Default)]
pub struct MockConnector {
    responses: HashMap<String, Result<Vec<MockSet>, String>>,
    delay: Option<Duration>,
    executed: Mutex<Vec<String>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returning(mut self, script: &str, sets: Vec<MockSet>) -> Self {
        self.responses.insert(script.to_string(), Ok(sets));
        self
    }

    pub fn rejecting(mut self, script: &str, message: &str) -> Self {
        self.responses
            .insert(script.to_string(), Err(message.to_string()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn execute(&self, script: &str) -> Result<Box<dyn ResultCursor>, SqlRunError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.executed.lock().unwrap().push(script.to_string());
        match self.responses.get(script) {
            Some(Err(message)) => Err(SqlRunError::InternalError(message.clone())),
            Some(Ok(sets)) => Ok(Box::new(MockCursor::new(sets.clone()))),
            None => Ok(Box::new(MockCursor::new(vec![]))),
        }
    }

    async fn ping(&self) -> Result<(), SqlRunError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), SqlRunError> {
        Ok(())
    }

    fn engine_name(&self) -> &str {
        "mock"
    }
}
