// sqlrun-core/src/domain/mod.rs

pub mod error;
pub mod outcome;
pub mod result;
pub mod script;
pub mod settings;

// Handy re-exports to keep imports short elsewhere
pub use error::DomainError;
pub use outcome::{BatchVerdict, Failure, FailureKind, ScriptOutcome, ScriptState, ScriptStatus};
pub use result::{Cell, ResultSet, Row};
pub use script::Script;
pub use settings::{
    ConnectionSettings, Engine, RunnerConfig, ScriptOrder, SourceSettings, SslMode,
    ValidationPolicy,
};
