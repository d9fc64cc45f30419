// sqlrun-core/src/application/validation.rs

use tracing::{info, instrument};

use crate::domain::outcome::{BatchVerdict, Failure, FailureKind, ScriptOutcome};
use crate::domain::script::Script;
use crate::ports::validator::SyntaxValidator;

/// Syntax-only pass over a batch: nothing is sent to a database.
#[instrument(skip_all, fields(scripts = scripts.len()))]
pub fn check_scripts(validator: &dyn SyntaxValidator, scripts: Vec<Script>) -> BatchVerdict {
    let outcomes = scripts
        .into_iter()
        .map(|script| match validator.validate(script.content()) {
            Ok(()) => ScriptOutcome::succeeded(script, Vec::new()),
            Err(e) => ScriptOutcome::failed(script, Failure::new(FailureKind::Validation, e.to_string())),
        })
        .collect();

    let verdict = BatchVerdict::from_outcomes(outcomes);
    info!(
        "🧪 {} scripts checked, {} rejected",
        verdict.outcomes().len(),
        verdict.failures().count()
    );
    verdict
}
