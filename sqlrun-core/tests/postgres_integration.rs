// Runs against a real server only when SQLRUN_TEST_PG_HOST is set, e.g.
// SQLRUN_TEST_PG_HOST=localhost SQLRUN_TEST_PG_PASSWORD=postgres cargo test

use anyhow::Result;
use sqlrun_core::application::{BatchRunner, RunOptions, execute_query};
use sqlrun_core::domain::outcome::FailureKind;
use sqlrun_core::domain::result::Cell;
use sqlrun_core::domain::script::Script;
use sqlrun_core::domain::settings::{ConnectionSettings, SslMode, ValidationPolicy};
use sqlrun_core::infrastructure::adapters::PostgresConnector;
use sqlrun_core::ports::connector::Connector;

fn settings_from_env() -> Option<ConnectionSettings> {
    let host = std::env::var("SQLRUN_TEST_PG_HOST").ok()?;
    let var = |name: &str, default: &str| std::env::var(name).unwrap_or_else(|_| default.into());
    Some(ConnectionSettings {
        host,
        port: var("SQLRUN_TEST_PG_PORT", "5432").parse().ok()?,
        username: var("SQLRUN_TEST_PG_USER", "postgres"),
        password: var("SQLRUN_TEST_PG_PASSWORD", ""),
        database: var("SQLRUN_TEST_PG_DATABASE", "postgres"),
        ssl_mode: SslMode::Prefer,
    })
}

async fn connect() -> Result<Option<PostgresConnector>> {
    match settings_from_env() {
        Some(settings) => Ok(Some(PostgresConnector::connect(&settings).await?)),
        None => {
            eprintln!("SQLRUN_TEST_PG_HOST not set, skipping");
            Ok(None)
        }
    }
}

#[tokio::test]
async fn test_multi_statement_script_yields_sets_in_order() -> Result<()> {
    let Some(connector) = connect().await? else {
        return Ok(());
    };

    let sets = execute_query(&connector, "SELECT 1 AS one; SELECT NULL AS a, '' AS b;").await?;

    assert_eq!(sets.len(), 2);
    assert_eq!(sets[0].column_names(), ["one"]);
    assert_eq!(sets[0].column_type_names(), ["INT4"]);
    assert_eq!(sets[0].rows(), [vec![Cell::text("1")]]);
    assert_eq!(sets[1].rows(), [vec![Cell::Null, Cell::text("")]]);

    connector.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_zero_row_statements_still_yield_sets() -> Result<()> {
    let Some(connector) = connect().await? else {
        return Ok(());
    };

    let sets = execute_query(
        &connector,
        "CREATE TEMP TABLE sqlrun_empty(x int, label text);\n\
         SELECT * FROM sqlrun_empty;\n\
         INSERT INTO sqlrun_empty VALUES (1, 'a');\n\
         SELECT 1 AS one WHERE false;\n\
         DELETE FROM sqlrun_empty WHERE false RETURNING x;",
    )
    .await?;

    assert_eq!(sets.len(), 3);
    assert_eq!(sets[0].column_names(), ["x", "label"]);
    assert_eq!(sets[0].column_type_names(), ["INT4", "TEXT"]);
    assert_eq!(sets[1].column_names(), ["one"]);
    assert_eq!(sets[2].column_names(), ["x"]);
    assert!(sets.iter().all(|set| set.rows().is_empty()));

    connector.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_user_defined_types_are_named() -> Result<()> {
    let Some(connector) = connect().await? else {
        return Ok(());
    };

    let sets = execute_query(
        &connector,
        "DROP TYPE IF EXISTS sqlrun_mood CASCADE;\n\
         CREATE TYPE sqlrun_mood AS ENUM ('ok', 'meh');\n\
         SELECT 'meh'::sqlrun_mood AS mood, 1.5::numeric AS n;",
    )
    .await?;
    execute_query(&connector, "DROP TYPE sqlrun_mood;").await?;

    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].column_type_names(), ["SQLRUN_MOOD", "NUMERIC"]);
    assert_eq!(sets[0].rows(), [vec![Cell::text("meh"), Cell::text("1.5")]]);

    connector.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_batch_continues_past_a_rejected_script() -> Result<()> {
    let Some(connector) = connect().await? else {
        return Ok(());
    };

    let scripts = vec![
        Script::new("01_create.sql", "CREATE TEMP TABLE sqlrun_t(x int);"),
        Script::new("02_bad.sql", "SELEC 1;"),
        Script::new("03_query.sql", "SELECT * FROM sqlrun_t;"),
    ];
    let options = RunOptions {
        validation: ValidationPolicy::Off,
        timeout: None,
    };

    let verdict = BatchRunner::new(&connector, options).run(scripts).await;

    assert!(verdict.overall_failed());
    let failures: Vec<_> = verdict.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0.name(), "02_bad.sql");
    assert_eq!(failures[0].1.kind, FailureKind::Execution);
    assert_eq!(verdict.success_count(), 2);
    // The empty temp table still comes back as a set.
    assert_eq!(verdict.outcomes()[2].result_sets().len(), 1);

    connector.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_execute_after_close_fails() -> Result<()> {
    let Some(connector) = connect().await? else {
        return Ok(());
    };
    connector.ping().await?;
    connector.close().await?;

    assert!(connector.execute("SELECT 1;").await.is_err());
    Ok(())
}
