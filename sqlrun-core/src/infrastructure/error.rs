// sqlrun-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("Postgres Error: {0}")]
    #[diagnostic(
        code(sqlrun::infra::database::postgres),
        help("The server rejected the script or the connection dropped.")
    )]
    Postgres(#[from] sqlx::Error),

    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(sqlrun::infra::database::duckdb),
        help("An error occurred inside the SQL engine.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("Cannot decode value: {0}")]
    #[diagnostic(code(sqlrun::infra::database::decode))]
    Decode(String),

    #[error("Connection already closed")]
    #[diagnostic(code(sqlrun::infra::database::closed))]
    Closed,
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    #[error("Cannot connect to {target}: {reason}")]
    #[diagnostic(
        code(sqlrun::infra::connection),
        help("Check host, port, credentials and sslmode.")
    )]
    Connection { target: String, reason: String },

    // --- SCRIPT SOURCE ---
    #[error("Script source unavailable: {0}")]
    #[diagnostic(
        code(sqlrun::infra::source),
        help("Check the scripts directory or the repository URL.")
    )]
    Source(String),

    #[error("Invalid script selection pattern: {0}")]
    #[diagnostic(code(sqlrun::infra::select))]
    InvalidPattern(#[from] regex::Error),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(sqlrun::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(sqlrun::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Runner configuration not found at '{0}'")]
    #[diagnostic(code(sqlrun::infra::config_missing))]
    ConfigNotFound(String),
}

// Manual implementations for shortcuts (e.g. `?` operator on driver calls)
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}

impl From<sqlx::Error> for InfrastructureError {
    fn from(err: sqlx::Error) -> Self {
        InfrastructureError::Database(DatabaseError::Postgres(err))
    }
}
