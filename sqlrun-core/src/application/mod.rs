// sqlrun-core/src/application/mod.rs

pub mod engine;
pub mod materialization;
pub mod pipeline;
pub mod report;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Lets the CLI write:
// `use sqlrun_core::application::{BatchRunner, RunOptions, execute_query};`

pub use engine::{execute_query, execute_script};
pub use materialization::Materializer;
pub use pipeline::{BatchRunner, RunOptions};
pub use report::RunReport;
pub use validation::check_scripts;
