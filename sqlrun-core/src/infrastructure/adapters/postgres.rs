// sqlrun-core/src/infrastructure/adapters/postgres.rs

use async_trait::async_trait;
use futures::TryStreamExt;
use sqlparser::dialect::PostgreSqlDialect;
use sqlx::postgres::types::Oid;
use sqlx::postgres::{PgColumn, PgConnectOptions, PgConnection, PgRow, PgSslMode};
use sqlx::{Column, Connection, Either, Executor, Row, TypeInfo, ValueRef};
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::cursor::{BufferedCursor, BufferedSet, DecodeRow};
use super::statements::split_statements;
use crate::domain::settings::{ConnectionSettings, SslMode};
use crate::error::SqlRunError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::connector::{ColumnMeta, Connector, RawRow, ResultCursor};

/// Name sqlx gives a type it has not resolved, e.g. an enum or a domain.
const UNRESOLVED_TYPE: &str = "?";

/// A single PostgreSQL session.
///
/// Scripts go over the simple query protocol in one round trip, so the server
/// owns statement splitting and values come back in text form. A statement
/// that completes without sending a row is described afterwards to tell a
/// zero-row result set from a statement that has none.
pub struct PostgresConnector {
    conn: Mutex<Option<PgConnection>>,
}

impl PostgresConnector {
    #[instrument(skip_all, fields(target = %settings.redacted()))]
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self, InfrastructureError> {
        let conn = PgConnection::connect_with(&connect_options(settings))
            .await
            .map_err(|e| InfrastructureError::Connection {
                target: settings.redacted(),
                reason: e.to_string(),
            })?;

        info!("🐘 Connected to PostgreSQL");
        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }
}

pub fn connect_options(settings: &ConnectionSettings) -> PgConnectOptions {
    let options = PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.username)
        .database(&settings.database)
        .ssl_mode(ssl_mode(settings.ssl_mode));

    if settings.password.is_empty() {
        options
    } else {
        options.password(&settings.password)
    }
}

fn ssl_mode(mode: SslMode) -> PgSslMode {
    match mode {
        SslMode::Disable => PgSslMode::Disable,
        SslMode::Allow => PgSslMode::Allow,
        SslMode::Prefer => PgSslMode::Prefer,
        SslMode::Require => PgSslMode::Require,
        SslMode::VerifyCa => PgSslMode::VerifyCa,
        SslMode::VerifyFull => PgSslMode::VerifyFull,
    }
}

/// What the server sent back for one statement, in completion order.
enum Completion {
    Rows(Vec<PgColumn>, VecDeque<PgRow>),
    /// Index of a statement that finished without sending a row.
    Rowless(usize),
}

#[async_trait]
impl Connector for PostgresConnector {
    #[instrument(skip_all)]
    async fn execute(&self, script: &str) -> Result<Box<dyn ResultCursor>, SqlRunError> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(DatabaseError::Closed)?;

        let completions = run_script(conn, script).await?;

        let mut statements = None;
        let mut sets = Vec::new();
        for completion in completions {
            let (columns, rows) = match completion {
                Completion::Rows(columns, rows) => (columns, rows),
                Completion::Rowless(index) => {
                    let statements = statements
                        .get_or_insert_with(|| split_statements(&PostgreSqlDialect {}, script));
                    match statements.get(index) {
                        Some(statement) if statement.returns_rows => {
                            match describe_columns(conn, &statement.sql).await {
                                Some(columns) if !columns.is_empty() => (columns, VecDeque::new()),
                                _ => continue,
                            }
                        }
                        _ => continue,
                    }
                }
            };
            sets.push((columns, rows));
        }

        let mut type_names = HashMap::new();
        let mut buffered = Vec::with_capacity(sets.len());
        for (columns, rows) in sets {
            let mut metas = Vec::with_capacity(columns.len());
            for column in &columns {
                let resolved = type_name(conn, column, &mut type_names).await;
                metas.push(ColumnMeta::new(column.name(), resolved));
            }
            let mut set = BufferedSet::new(metas);
            set.rows = rows.into_iter().map(TextRow).collect();
            buffered.push(set);
        }

        Ok(Box::new(BufferedCursor::new(buffered)))
    }

    async fn ping(&self) -> Result<(), SqlRunError> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(DatabaseError::Closed)?;
        conn.ping().await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), SqlRunError> {
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.take() {
            conn.close().await?;
        }
        Ok(())
    }

    fn engine_name(&self) -> &str {
        "postgres"
    }
}

/// Sends the script in one simple query and groups what comes back.
async fn run_script(conn: &mut PgConnection, script: &str) -> Result<Vec<Completion>, SqlRunError> {
    let mut stream = sqlx::raw_sql(script).fetch_many(&mut *conn);
    let mut completions = Vec::new();
    let mut current: Option<(Vec<PgColumn>, VecDeque<PgRow>)> = None;
    let mut completed = 0usize;

    while let Some(step) = stream.try_next().await? {
        match step {
            Either::Left(done) => {
                debug!(rows_affected = done.rows_affected(), "Statement complete");
                completions.push(match current.take() {
                    Some((columns, rows)) => Completion::Rows(columns, rows),
                    None => Completion::Rowless(completed),
                });
                completed += 1;
            }
            Either::Right(row) => {
                current
                    .get_or_insert_with(|| (row.columns().to_vec(), VecDeque::new()))
                    .1
                    .push_back(row);
            }
        }
    }
    if let Some((columns, rows)) = current.take() {
        completions.push(Completion::Rows(columns, rows));
    }

    Ok(completions)
}

/// Asks the server for the row shape of a statement that returned no row.
///
/// The statement already ran, so describing it can fail when it depends on
/// objects the rest of the script dropped. Such a statement yields no set.
async fn describe_columns(conn: &mut PgConnection, sql: &str) -> Option<Vec<PgColumn>> {
    match (&mut *conn).describe(sql).await {
        Ok(described) => Some(described.columns().to_vec()),
        Err(e) => {
            warn!(sql = %sql.trim(), "Could not describe rowless statement: {}", e);
            None
        }
    }
}

/// The column's type name, looked up in `pg_type` when sqlx left it unresolved.
async fn type_name(
    conn: &mut PgConnection,
    column: &PgColumn,
    cache: &mut HashMap<Oid, String>,
) -> String {
    let info = column.type_info();
    let name = info.name();
    if name != UNRESOLVED_TYPE {
        return name.to_string();
    }
    let Some(oid) = info.oid() else {
        return name.to_string();
    };
    if let Some(known) = cache.get(&oid) {
        return known.clone();
    }

    let looked_up: Result<Option<String>, sqlx::Error> =
        sqlx::query_scalar("SELECT typname::text FROM pg_catalog.pg_type WHERE oid = $1")
            .bind(oid)
            .fetch_optional(&mut *conn)
            .await;
    let resolved = match looked_up {
        Ok(Some(typname)) => typname.to_uppercase(),
        Ok(None) => name.to_string(),
        Err(e) => {
            warn!(oid = oid.0, "Could not resolve column type: {}", e);
            name.to_string()
        }
    };
    cache.insert(oid, resolved.clone());
    resolved
}

/// A text-format row as the server sent it.
pub struct TextRow(PgRow);

impl DecodeRow for TextRow {
    fn decode(self) -> Result<RawRow, SqlRunError> {
        let row = self.0;
        (0..row.len())
            .map(|index| -> Result<Option<Vec<u8>>, SqlRunError> {
                let value = row.try_get_raw(index)?;
                if value.is_null() {
                    return Ok(None);
                }
                value
                    .as_bytes()
                    .map(|bytes| Some(bytes.to_vec()))
                    .map_err(|e| DatabaseError::Decode(e.to_string()).into())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_options_follow_settings() {
        let settings = ConnectionSettings {
            host: "db.internal".into(),
            port: 6543,
            username: "ci".into(),
            password: "s3cret".into(),
            database: "template1".into(),
            ssl_mode: SslMode::Require,
        };

        let options = connect_options(&settings);

        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "ci");
        assert_eq!(options.get_database(), Some("template1"));
    }

    #[test]
    fn test_ssl_modes_map_one_to_one() {
        assert!(matches!(ssl_mode(SslMode::Disable), PgSslMode::Disable));
        assert!(matches!(ssl_mode(SslMode::Allow), PgSslMode::Allow));
        assert!(matches!(ssl_mode(SslMode::Prefer), PgSslMode::Prefer));
        assert!(matches!(ssl_mode(SslMode::Require), PgSslMode::Require));
        assert!(matches!(ssl_mode(SslMode::VerifyCa), PgSslMode::VerifyCa));
        assert!(matches!(ssl_mode(SslMode::VerifyFull), PgSslMode::VerifyFull));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_connection_error() {
        let settings = ConnectionSettings {
            host: "127.0.0.1".into(),
            port: 1,
            ..Default::default()
        };

        let result = PostgresConnector::connect(&settings).await;

        assert!(matches!(
            result,
            Err(InfrastructureError::Connection { .. })
        ));
    }
}
