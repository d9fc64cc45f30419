// sqlrun-core/src/application/pipeline.rs

use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::application::engine;
use crate::application::materialization::Materializer;
use crate::domain::outcome::{BatchVerdict, Failure, FailureKind, ScriptOutcome, ScriptState};
use crate::domain::script::Script;
use crate::domain::settings::{RunnerConfig, ValidationPolicy};
use crate::ports::connector::Connector;
use crate::ports::validator::SyntaxValidator;

/// Knobs of one batch run, taken from the resolved `RunnerConfig`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub validation: ValidationPolicy,
    pub timeout: Option<Duration>,
}

impl RunOptions {
    pub fn from_config(config: &RunnerConfig) -> Self {
        Self {
            validation: config.validation,
            timeout: config.timeout(),
        }
    }
}

/// Runs scripts one after the other on a single connection.
///
/// Best effort: a failing script is recorded and the batch moves on. Nothing is
/// retried and nothing is rolled back.
pub struct BatchRunner<'a> {
    connector: &'a dyn Connector,
    validator: Option<&'a dyn SyntaxValidator>,
    options: RunOptions,
}

impl<'a> BatchRunner<'a> {
    pub fn new(connector: &'a dyn Connector, options: RunOptions) -> Self {
        Self {
            connector,
            validator: None,
            options,
        }
    }

    pub fn with_validator(mut self, validator: &'a dyn SyntaxValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Executes `scripts` in the given order and aggregates the verdict.
    #[instrument(skip_all, fields(engine = self.connector.engine_name(), scripts = scripts.len()))]
    pub async fn run(&self, scripts: Vec<Script>) -> BatchVerdict {
        info!("🚀 Starting batch of {} scripts", scripts.len());
        let start = Instant::now();

        let mut outcomes = Vec::with_capacity(scripts.len());
        for script in scripts {
            let outcome = self.run_script(script).await;

            match outcome.failure() {
                Some(failure) => warn!(
                    script = %outcome.script().name(),
                    kind = %failure.kind,
                    "❌ {}",
                    failure.message
                ),
                None => info!(
                    script = %outcome.script().name(),
                    result_sets = outcome.result_sets().len(),
                    "✅ Script completed in {} ms",
                    outcome.elapsed_ms()
                ),
            }

            outcomes.push(outcome);
        }

        let verdict = BatchVerdict::from_outcomes(outcomes);
        info!(
            failed = verdict.overall_failed(),
            "✨ Batch finished in {:.2?}: {} ok, {} failed",
            start.elapsed(),
            verdict.success_count(),
            verdict.failures().count()
        );
        verdict
    }

    async fn run_script(&self, script: Script) -> ScriptOutcome {
        let start = Instant::now();
        let mut warnings = Vec::new();

        // A. Validation (optional)
        if let Some(validator) = self.validator
            && self.options.validation != ValidationPolicy::Off
        {
            enter(&script, ScriptState::Validating);
            if let Err(e) = validator.validate(script.content()) {
                if self.options.validation == ValidationPolicy::Enforce {
                    let failure = Failure::new(FailureKind::Validation, e.to_string());
                    return finish(ScriptOutcome::failed(script, failure), start);
                }
                warn!(script = %script.name(), "⚠️  {} (executing anyway)", e);
                warnings.push(e.to_string());
            }
            enter(&script, ScriptState::Validated);
        }

        // B. Execution
        enter(&script, ScriptState::Executing);
        let mut cursor =
            match engine::execute_script(self.connector, script.content(), self.options.timeout)
                .await
            {
                Ok(cursor) => cursor,
                Err(e) => {
                    let failure = Failure::new(FailureKind::Execution, e.to_string());
                    let outcome = ScriptOutcome::failed(script, failure).with_warnings(warnings);
                    return finish(outcome, start);
                }
            };

        // C. Materialization
        enter(&script, ScriptState::Materializing);
        let outcome = match Materializer::drain(cursor.as_mut()) {
            Ok(result_sets) => ScriptOutcome::succeeded(script, result_sets),
            Err(e) => {
                ScriptOutcome::failed(script, Failure::new(FailureKind::Materialization, e.to_string()))
            }
        };

        finish(outcome.with_warnings(warnings), start)
    }
}

fn enter(script: &Script, state: ScriptState) {
    debug!(script = %script.name(), state = %state, "state transition");
}

fn finish(outcome: ScriptOutcome, start: Instant) -> ScriptOutcome {
    enter(outcome.script(), outcome.final_state());
    let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    outcome.with_elapsed_ms(elapsed_ms)
}
