// sqlrun-core/src/infrastructure/adapters/statements.rs

// Statement boundaries and a cheap guess at which statements produce rows.
// DuckDB runs one statement per call; Postgres uses the split to line up
// server completions with the statements that produced them.

use sqlparser::dialect::Dialect;
use sqlparser::tokenizer::{Token, Tokenizer};

/// Leading keywords of statements that never hand back rows unless they carry
/// a top-level RETURNING clause. Anything else is treated as row-returning.
const COMMAND_KEYWORDS: &[&str] = &[
    "ABORT",
    "ALTER",
    "ANALYZE",
    "ATTACH",
    "BEGIN",
    "CHECKPOINT",
    "CLOSE",
    "CLUSTER",
    "COMMENT",
    "COMMIT",
    "COPY",
    "CREATE",
    "DEALLOCATE",
    "DECLARE",
    "DELETE",
    "DETACH",
    "DISCARD",
    "DO",
    "DROP",
    "END",
    "EXPORT",
    "FORCE",
    "GRANT",
    "IMPORT",
    "INSERT",
    "INSTALL",
    "LISTEN",
    "LOAD",
    "LOCK",
    "MERGE",
    "MOVE",
    "NOTIFY",
    "PREPARE",
    "REFRESH",
    "REINDEX",
    "RELEASE",
    "RESET",
    "REVOKE",
    "ROLLBACK",
    "SAVEPOINT",
    "SET",
    "START",
    "TRUNCATE",
    "UNLISTEN",
    "UPDATE",
    "UPSERT",
    "USE",
    "VACUUM",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub returns_rows: bool,
}

/// Splits a script on top-level semicolons.
///
/// Segments holding only whitespace or comments are dropped. When the text
/// cannot be tokenized it is returned as a single statement so the engine
/// reports the error itself.
pub fn split_statements(dialect: &dyn Dialect, script: &str) -> Vec<Statement> {
    let tokens = match Tokenizer::new(dialect, script)
        .with_unescape(false)
        .tokenize()
    {
        Ok(tokens) => tokens,
        Err(_) => {
            return if script.trim().is_empty() {
                Vec::new()
            } else {
                vec![Statement {
                    sql: script.to_string(),
                    returns_rows: true,
                }]
            };
        }
    };

    tokens
        .split(|t| matches!(t, Token::SemiColon))
        .filter(|segment| segment.iter().any(is_significant))
        .map(|segment| Statement {
            sql: segment.iter().map(Token::to_string).collect(),
            returns_rows: returns_rows(segment),
        })
        .collect()
}

fn is_significant(token: &Token) -> bool {
    !matches!(token, Token::Whitespace(_) | Token::EOF)
}

fn returns_rows(segment: &[Token]) -> bool {
    let mut significant = segment.iter().filter(|t| is_significant(t));
    match significant.next() {
        Some(Token::Word(word)) if word.quote_style.is_none() => {
            let keyword = word.value.to_uppercase();
            if COMMAND_KEYWORDS.binary_search(&keyword.as_str()).is_err() {
                return true;
            }
        }
        Some(Token::LParen) => return true,
        _ => return false,
    }

    // DML with a top-level RETURNING clause.
    let mut depth = 0usize;
    for token in segment {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            Token::Word(word)
                if depth == 0
                    && word.quote_style.is_none()
                    && word.value.eq_ignore_ascii_case("RETURNING") =>
            {
                return true;
            }
            _ => {}
        }
    }
    false
}
