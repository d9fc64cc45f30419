// sqlrun-core/src/domain/error.rs

use miette::Diagnostic;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Syntax error: {0}")]
    #[diagnostic(
        code(sqlrun::domain::syntax),
        help("Use `validation: warn` to run rejected scripts anyway.")
    )]
    Syntax(String),

    #[error("Row has {found} values but the result set declares {expected} columns")]
    #[diagnostic(code(sqlrun::domain::row_shape))]
    RowShape { expected: usize, found: usize },

    #[error("Script did not finish within {0:?}")]
    #[diagnostic(
        code(sqlrun::domain::timeout),
        help("Raise `timeout_secs` or split the script.")
    )]
    Timeout(Duration),

    #[error("Cursor misuse: {0}")]
    #[diagnostic(code(sqlrun::domain::cursor))]
    CursorState(String),
}
