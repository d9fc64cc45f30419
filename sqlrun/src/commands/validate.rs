// sqlrun/src/commands/validate.rs
//
// USE CASE: Syntax-check the batch without a database.

use anyhow::Context;

use crate::cli::ValidateArgs;
use crate::report;
use sqlrun_core::application::check_scripts;
use sqlrun_core::infrastructure::{SqlParserValidator, source};

pub fn execute(args: ValidateArgs) -> anyhow::Result<()> {
    let config = super::resolve_config(args.config.as_deref(), |c| {
        if let Some(engine) = args.engine {
            c.engine = engine;
        }
        args.source.apply(&mut c.source);
    })?;

    let script_source = source::from_settings(&config.source)?;
    let scripts = script_source
        .load()
        .with_context(|| format!("Failed to load scripts from {}", script_source.describe()))?;
    println!(
        "🧪 Checking {} scripts from {} ({} dialect)",
        scripts.len(),
        script_source.describe(),
        config.engine
    );

    let verdict = check_scripts(&SqlParserValidator::for_engine(config.engine), scripts);
    for outcome in verdict.outcomes() {
        println!("{}", report::outcome_line(outcome));
    }
    report::print_failures(&verdict);

    if verdict.overall_failed() {
        std::process::exit(1);
    }
    println!("\n✨ All scripts parsed.");
    Ok(())
}
