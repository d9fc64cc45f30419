// sqlrun/src/commands/query.rs
//
// USE CASE: Execute a raw SQL text (ad-hoc).

use anyhow::Context;
use tracing::warn;

use crate::cli::QueryArgs;
use crate::report;
use sqlrun_core::application::execute_query;
use sqlrun_core::infrastructure::open_connector;

pub async fn execute(args: QueryArgs) -> anyhow::Result<()> {
    let config = super::resolve_config(args.target.config.as_deref(), |c| args.target.apply(c))?;

    let connector = open_connector(&config)
        .await
        .context("Failed to open database connection")?;
    let result = execute_query(connector.as_ref(), &args.query).await;

    if let Err(e) = connector.close().await {
        warn!("Failed to close connection: {}", e);
    }

    match result {
        Ok(sets) => {
            report::print_result_sets(&sets);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Query failed: {}", e);
            std::process::exit(1);
        }
    }
}
