// sqlrun-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqlRunError {
    // --- DOMAIN ERRORS (syntax rejection, row shape, timeout) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (source, connection, database, IO) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- GENERIC / APPLICATION ERRORS ---
    #[error("Internal Error: {0}")]
    InternalError(String),
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for SqlRunError {
    fn from(err: std::io::Error) -> Self {
        SqlRunError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<DatabaseError> for SqlRunError {
    fn from(err: DatabaseError) -> Self {
        SqlRunError::Infrastructure(InfrastructureError::Database(err))
    }
}

impl From<duckdb::Error> for SqlRunError {
    fn from(err: duckdb::Error) -> Self {
        SqlRunError::Infrastructure(InfrastructureError::from(err))
    }
}

impl From<sqlx::Error> for SqlRunError {
    fn from(err: sqlx::Error) -> Self {
        SqlRunError::Infrastructure(InfrastructureError::from(err))
    }
}
