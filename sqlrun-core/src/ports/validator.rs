// sqlrun-core/src/ports/validator.rs

use crate::domain::error::DomainError;

/// Pure syntax check. Same text, same verdict; no side effects.
pub trait SyntaxValidator: Send + Sync {
    fn validate(&self, sql: &str) -> Result<(), DomainError>;
}
