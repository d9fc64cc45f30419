// sqlrun-core/src/infrastructure/validator.rs

use sqlparser::dialect::{DuckDbDialect, GenericDialect, PostgreSqlDialect};
use sqlparser::parser::Parser;

use crate::domain::error::DomainError;
use crate::domain::settings::Engine;
use crate::ports::validator::SyntaxValidator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqlDialect {
    #[default]
    Generic,
    PostgreSql,
    DuckDb,
}

impl From<Engine> for SqlDialect {
    fn from(engine: Engine) -> Self {
        match engine {
            Engine::Postgres => SqlDialect::PostgreSql,
            Engine::DuckDB => SqlDialect::DuckDb,
        }
    }
}

/// Offline syntax check backed by `sqlparser`.
///
/// The parser is stricter than some servers on vendor extensions, which is why
/// the runner lets a rejection be downgraded to a warning.
#[derive(Debug, Clone, Default)]
pub struct SqlParserValidator {
    dialect: SqlDialect,
}

impl SqlParserValidator {
    pub fn new(dialect: SqlDialect) -> Self {
        Self { dialect }
    }

    pub fn for_engine(engine: Engine) -> Self {
        Self::new(engine.into())
    }

    fn parse(&self, sql: &str) -> Result<(), DomainError> {
        let parsed = match self.dialect {
            SqlDialect::Generic => Parser::parse_sql(&GenericDialect {}, sql),
            SqlDialect::PostgreSql => Parser::parse_sql(&PostgreSqlDialect {}, sql),
            SqlDialect::DuckDb => Parser::parse_sql(&DuckDbDialect {}, sql),
        };
        parsed
            .map(|_statements| ())
            .map_err(|e| DomainError::Syntax(e.to_string()))
    }
}

impl SyntaxValidator for SqlParserValidator {
    fn validate(&self, sql: &str) -> Result<(), DomainError> {
        self.parse(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_multi_statement_script() {
        let validator = SqlParserValidator::for_engine(Engine::Postgres);
        let script = "CREATE TABLE t(x int);\nINSERT INTO t VALUES (1);\nSELECT x FROM t;";
        assert!(validator.validate(script).is_ok());
    }

    #[test]
    fn test_typo_is_rejected() {
        let validator = SqlParserValidator::for_engine(Engine::Postgres);
        let err = validator.validate("SELEC 1;");
        assert!(matches!(err, Err(DomainError::Syntax(msg)) if msg.contains("SELEC")));
    }

    #[test]
    fn test_comment_only_script_is_valid() {
        let validator = SqlParserValidator::default();
        assert!(validator.validate("-- nothing to do yet\n").is_ok());
    }

    #[test]
    fn test_same_text_same_verdict() {
        let validator = SqlParserValidator::for_engine(Engine::DuckDB);
        for text in ["SELECT 1; SELECT 2, 3;", "SELECT FROM WHERE;"] {
            let first = validator.validate(text).map_err(|e| e.to_string());
            let second = validator.validate(text).map_err(|e| e.to_string());
            assert_eq!(first, second);
        }
    }
}
