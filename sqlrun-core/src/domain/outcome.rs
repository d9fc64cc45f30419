// sqlrun-core/src/domain/outcome.rs

use serde::Serialize;
use std::fmt;

use crate::domain::result::ResultSet;
use crate::domain::script::Script;

/// Lifecycle of one script inside a batch. Scripts only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptState {
    Pending,
    Validating,
    Validated,
    ValidationFailed,
    Executing,
    ExecutionFailed,
    Materializing,
    MaterializationFailed,
    Completed,
}

impl ScriptState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ScriptState::ValidationFailed
                | ScriptState::ExecutionFailed
                | ScriptState::MaterializationFailed
                | ScriptState::Completed
        )
    }
}

impl fmt::Display for ScriptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScriptState::Pending => "pending",
            ScriptState::Validating => "validating",
            ScriptState::Validated => "validated",
            ScriptState::ValidationFailed => "validation_failed",
            ScriptState::Executing => "executing",
            ScriptState::ExecutionFailed => "execution_failed",
            ScriptState::Materializing => "materializing",
            ScriptState::MaterializationFailed => "materialization_failed",
            ScriptState::Completed => "completed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Validation,
    Execution,
    Materialization,
}

impl FailureKind {
    /// Terminal state a script ends in when it fails this way.
    pub fn terminal_state(self) -> ScriptState {
        match self {
            FailureKind::Validation => ScriptState::ValidationFailed,
            FailureKind::Execution => ScriptState::ExecutionFailed,
            FailureKind::Materialization => ScriptState::MaterializationFailed,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Validation => f.write_str("validation"),
            FailureKind::Execution => f.write_str("execution"),
            FailureKind::Materialization => f.write_str("materialization"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScriptStatus {
    Success,
    Failure(Failure),
}

impl ScriptStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, ScriptStatus::Failure(_))
    }
}

/// What happened to one script. A failed script never carries result sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptOutcome {
    script: Script,
    #[serde(flatten)]
    status: ScriptStatus,
    result_sets: Vec<ResultSet>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    elapsed_ms: u64,
}

impl ScriptOutcome {
    pub fn succeeded(script: Script, result_sets: Vec<ResultSet>) -> Self {
        Self {
            script,
            status: ScriptStatus::Success,
            result_sets,
            warnings: Vec::new(),
            elapsed_ms: 0,
        }
    }

    pub fn failed(script: Script, failure: Failure) -> Self {
        Self {
            script,
            status: ScriptStatus::Failure(failure),
            result_sets: Vec::new(),
            warnings: Vec::new(),
            elapsed_ms: 0,
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn with_elapsed_ms(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn status(&self) -> &ScriptStatus {
        &self.status
    }

    pub fn failure(&self) -> Option<&Failure> {
        match &self.status {
            ScriptStatus::Failure(f) => Some(f),
            ScriptStatus::Success => None,
        }
    }

    pub fn result_sets(&self) -> &[ResultSet] {
        &self.result_sets
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn final_state(&self) -> ScriptState {
        match &self.status {
            ScriptStatus::Success => ScriptState::Completed,
            ScriptStatus::Failure(f) => f.kind.terminal_state(),
        }
    }
}

/// Aggregate of one run: outcomes in execution order plus the pass/fail flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchVerdict {
    outcomes: Vec<ScriptOutcome>,
    overall_failed: bool,
}

impl BatchVerdict {
    pub fn from_outcomes(outcomes: Vec<ScriptOutcome>) -> Self {
        let overall_failed = outcomes.iter().any(|o| o.status.is_failure());
        Self {
            outcomes,
            overall_failed,
        }
    }

    pub fn outcomes(&self) -> &[ScriptOutcome] {
        &self.outcomes
    }

    pub fn overall_failed(&self) -> bool {
        self.overall_failed
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Script, &Failure)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.failure().map(|f| (&o.script, f)))
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.len() - self.failures().count()
    }
}
