// sqlrun/src/commands/run.rs
//
// USE CASE: Run every script of the batch against one connection.

use anyhow::Context;
use chrono::Utc;
use std::path::Path;
use tracing::warn;

use crate::cli::RunArgs;
use crate::report;
use sqlrun_core::application::{BatchRunner, RunOptions, RunReport};
use sqlrun_core::infrastructure::{SqlParserValidator, open_connector, source};

pub async fn execute(args: RunArgs) -> anyhow::Result<()> {
    let started_at = Utc::now();
    let start = std::time::Instant::now();

    // A. Configuration
    println!("⚙️  Loading configuration...");
    let config = super::resolve_config(args.target.config.as_deref(), |c| args.apply(c))?;

    // B. Scripts (all of them are read before anything runs)
    let script_source = source::from_settings(&config.source)?;
    let scripts = script_source
        .load()
        .with_context(|| format!("Failed to load scripts from {}", script_source.describe()))?;
    println!("   Source: {} ({} scripts)", script_source.describe(), scripts.len());

    // C. Connection (fail fast, before the first script)
    let connector = open_connector(&config)
        .await
        .context("Failed to open database connection")?;
    println!("   Engine: {}", connector.engine_name());

    // D. Batch
    let validator = SqlParserValidator::for_engine(config.engine);
    let verdict = BatchRunner::new(connector.as_ref(), RunOptions::from_config(&config))
        .with_validator(&validator)
        .run(scripts)
        .await;

    if let Err(e) = connector.close().await {
        warn!("Failed to close connection: {}", e);
    }

    // E. Reporting
    report::print_verdict(&verdict, args.quiet);
    report::print_failures(&verdict);

    if let Some(path) = &config.report_path {
        RunReport::new(started_at, connector.engine_name(), script_source.describe(), &verdict)
            .save(Path::new(path))
            .with_context(|| format!("Failed to write report to {}", path))?;
        println!("📝 Report written to {}", path);
    }

    if verdict.overall_failed() {
        eprintln!(
            "\n❌ FAILURE. {} of {} scripts failed.",
            verdict.failures().count(),
            verdict.outcomes().len()
        );
        std::process::exit(1);
    }

    println!(
        "\n✨ SUCCESS! {} scripts finished in {:.2?}",
        verdict.success_count(),
        start.elapsed()
    );
    Ok(())
}
